use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// RBAC routing core: guard, route table, navigation.
pub mod access;
pub mod nav;

// Core application services and components.
pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod session;

// Routing segregation (public, authenticated, reports, admin, pages).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, pages, public, reports};

// --- Public Re-exports ---

pub use access::{Decision, RouteTable, SessionSnapshot};
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};
pub use session::{InMemorySessionStore, SessionState};

/// ApiDoc
///
/// Aggregates the OpenAPI documentation for every handler decorated with
/// `#[utoipa::path]`. Served as JSON at `/api-docs/openapi.json` and
/// rendered at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::register, handlers::logout, handlers::me,
        handlers::navigation,
        handlers::get_departments, handlers::get_doctors_schedule,
        handlers::get_doctors_by_department,
        handlers::get_available_slots, handlers::create_appointment,
        handlers::get_patient_profile, handlers::update_patient_profile,
        handlers::get_my_appointments, handlers::cancel_appointment,
        handlers::get_doctor_profile,
        handlers::get_doctor_worklist, handlers::record_visit,
        handlers::get_report_types, handlers::get_report_doctors,
        handlers::generate_report, handlers::get_report_history,
        handlers::delete_report,
        handlers::get_admin_tables, handlers::get_admin_table,
    ),
    components(
        schemas(
            models::Role, models::Identity, models::LoginRequest, models::RegisterRequest,
            models::AuthResponse, models::Department, models::DoctorRef,
            models::ScheduleWindow, models::DoctorSchedule, models::AvailableSlots,
            models::CreateAppointmentRequest, models::AppointmentRecord,
            models::PatientProfile, models::UpdatePatientProfileRequest,
            models::DoctorProfile, models::DoctorAppointment, models::RecordVisitRequest,
            models::ReportType, models::GenerateReportRequest, models::ReportResult,
            models::ReportHistoryItem, models::TableDump,
            models::MessageResponse, models::ErrorResponse,
            nav::NavItem, access::Decision,
        )
    ),
    tags(
        (name = "clinic-portal", description = "Clinic appointment portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container holding all application services,
/// shared across every request.
#[derive(Clone)]
pub struct AppState {
    /// Repository layer: database access behind `Arc<dyn Repository>`.
    pub repo: RepositoryState,
    /// Session layer: server-side sessions behind `Arc<dyn SessionStore>`.
    pub sessions: SessionState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

// FromRef implementations let extractors pull individual services out of
// the shared state without seeing the rest.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Gate for the authenticated route module. Extracting `AuthUser` rejects
/// with 401 before the handler runs when no valid session is present.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the full routing structure and applies global middleware.
///
/// # Panics
/// Panics when the route table contains duplicate paths or the navigation
/// table misses a role — configuration errors that must surface before
/// the listener binds, not at request time.
pub fn create_router(state: AppState) -> Router {
    // Startup validation: the page map and the menu table fail fast.
    let route_table = RouteTable::standard();
    if let Err(role) = nav::verify_totality() {
        panic!("navigation table has no entries for role {:?}", role);
    }

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Documentation: auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Guarded page routes, generated from the route table.
        .merge(pages::page_routes(&route_table))
        // Public API: auth gateway, schedule, nav, health.
        .merge(public::public_routes())
        // Authenticated API: rejected with 401 at the layer boundary.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Role-restricted API: manager/admin checks inside the handlers.
        .nest("/api/reports", reports::report_routes())
        .nest("/api/admin", admin::admin_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Request correlation: a UUID per request, propagated back
                // to the client and into every log line.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: binds the request id, method and URI so
/// every log line for one request is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
