use crate::{
    AppState,
    access::{self, Decision, RouteEntry, RouteName, RouteTable, SessionSnapshot},
    auth::MaybeAuthUser,
};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};

/// Pages Router Module
///
/// Builds the page router FROM the route table, so the table stays the
/// single source of truth for paths and access requirements. Each page
/// request resolves the session, runs the access guard, and either serves
/// the page shell or answers with the guard's redirect.
pub fn page_routes(table: &RouteTable) -> Router<AppState> {
    let mut router = Router::new();
    for entry in table.entries() {
        let entry = entry.clone();
        router = router.route(
            entry.path,
            get(move |user: MaybeAuthUser| page_gate(entry.clone(), user)),
        );
    }
    router
}

/// The page component is an opaque collaborator; the shell only names it.
fn page_title(name: RouteName) -> &'static str {
    match name {
        RouteName::Main => "Clinic",
        RouteName::Home => "Home",
        RouteName::Schedule => "Schedule",
        RouteName::Appointment => "Book appointment",
        RouteName::Profile => "My profile",
        RouteName::Login => "Sign in",
        RouteName::Register => "Register",
        RouteName::Reports => "Reports",
        RouteName::Admin => "Admin panel",
        RouteName::AccessDenied => "Access denied",
    }
}

async fn page_gate(entry: RouteEntry, MaybeAuthUser(user): MaybeAuthUser) -> Response {
    // Server-side the session lookup has already happened, so the snapshot
    // is always in the initialized state here.
    let session = SessionSnapshot::resolved(user.map(|u| u.identity()));

    match access::evaluate(&session, &entry) {
        Decision::Allow => Html(format!(
            "<!doctype html><html><head><title>{title}</title></head>\
             <body><main data-page=\"{path}\">{title}</main></body></html>",
            title = page_title(entry.name),
            path = entry.path,
        ))
        .into_response(),
        Decision::Redirect { to, from } => match from {
            Some(origin) => Redirect::to(&format!("{to}?from={origin}")).into_response(),
            None => Redirect::to(&to).into_response(),
        },
        // Unreachable for resolved snapshots; kept total rather than
        // panicking on a guard change.
        Decision::Loading => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
