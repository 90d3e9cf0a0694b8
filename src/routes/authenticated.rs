use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Authenticated Router Module
///
/// Routes for any user with a live session. The `AuthUser` extractor
/// middleware layered above this module guarantees every handler receives
/// a verified identity; per-role checks (patient-only booking, doctor-only
/// visit recording) happen inside the handlers against that identity.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/auth/me
        // Identity restore for client startup.
        .route("/api/auth/me", get(handlers::me))
        // --- Profile ---
        .route(
            "/api/profile/patient",
            get(handlers::get_patient_profile).put(handlers::update_patient_profile),
        )
        .route(
            "/api/profile/appointments",
            get(handlers::get_my_appointments),
        )
        // DELETE /api/profile/appointments/{id}
        // Owner-only cancellation.
        .route(
            "/api/profile/appointments/{id}",
            delete(handlers::cancel_appointment),
        )
        .route("/api/profile/doctor", get(handlers::get_doctor_profile))
        // --- Booking ---
        .route(
            "/api/appointment/available-slots",
            get(handlers::get_available_slots),
        )
        // POST /api/appointment/create
        // Patient role enforced in the handler; 409 on a taken slot.
        .route("/api/appointment/create", post(handlers::create_appointment))
        // --- Doctor Worklist ---
        .route(
            "/api/doctor/appointments",
            get(handlers::get_doctor_worklist),
        )
        .route("/api/doctor/visits", post(handlers::record_visit))
}
