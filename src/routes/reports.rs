use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Reports Router Module
///
/// Nested under `/api/reports`. Every handler re-checks that the resolved
/// identity is a manager or admin; the page-level guard on `/reports` is
/// only the UX layer in front of these checks.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        // GET /api/reports/types
        .route("/types", get(handlers::get_report_types))
        // GET /api/reports/available-doctors
        // Doctors that have recorded visits, for the per-doctor filter.
        .route("/available-doctors", get(handlers::get_report_doctors))
        // POST /api/reports/generate
        // Runs one of the canned reports and persists the summary.
        .route("/generate", post(handlers::generate_report))
        // GET /api/reports/history
        // The requester's previously generated reports.
        .route("/history", get(handlers::get_report_history))
        // DELETE /api/reports/{id}
        // Owner-scoped deletion.
        .route("/{id}", delete(handlers::delete_report))
}
