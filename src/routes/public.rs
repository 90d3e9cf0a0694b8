use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session: the auth gateway, the schedule
/// browser (the clinic's schedule is public information), the menu feed
/// and the health probe.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitoring.
        .route("/health", get(|| async { "ok" }))
        // POST /api/auth/login
        // Credential check; opens a server-side session and sets the cookie.
        .route("/api/auth/login", post(handlers::login))
        // POST /api/auth/register
        // Patient self-registration. 409 when the login is taken.
        .route("/api/auth/register", post(handlers::register))
        // POST /api/auth/logout
        // Destroys the session and expires the cookie. Safe without one.
        .route("/api/auth/logout", post(handlers::logout))
        // GET /api/nav
        // Menu links derived from the current identity; anonymous-safe.
        .route("/api/nav", get(handlers::navigation))
        // GET /api/schedule/departments
        .route("/api/schedule/departments", get(handlers::get_departments))
        // GET /api/schedule/doctors
        .route("/api/schedule/doctors", get(handlers::get_doctors_schedule))
        // GET /api/schedule/doctors/{department_id}
        .route(
            "/api/schedule/doctors/{department_id}",
            get(handlers::get_doctors_by_department),
        )
}
