use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Nested under `/api/admin`. The raw-table viewer for the admin panel;
/// the admin role is enforced inside each handler, and table names are
/// checked against a fixed whitelist before any SQL touches them.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/tables
        // Names of the tables the viewer may open.
        .route("/tables", get(handlers::get_admin_tables))
        // GET /api/admin/table/{name}
        // Column list plus raw rows of one whitelisted table.
        .route("/table/{name}", get(handlers::get_admin_table))
}
