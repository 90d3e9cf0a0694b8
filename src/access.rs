use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::{Identity, Role};

/// SessionSnapshot
///
/// The client-visible authentication state the routing layer operates on.
/// Created once at startup with `initialized = false`; `init` flips the flag
/// exactly once after the identity-restore attempt resolves, whether or not
/// it succeeded. A failed restore leaves `identity = None` — an unauthenticated
/// visitor, never an error surfaced to the routing layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub initialized: bool,
}

impl SessionSnapshot {
    /// Fresh snapshot as it exists before the identity restore resolves.
    /// The access guard treats this state as "render nothing yet".
    pub fn new() -> Self {
        Self::default()
    }

    /// Completes the startup identity restore. `restored` is the outcome of
    /// the backend call: `Some` when a live session was found, `None` on any
    /// failure (expired cookie, 401, network error). Failure is silent by
    /// contract — the visitor simply browses anonymously.
    pub fn init(&mut self, restored: Option<Identity>) {
        self.identity = restored;
        self.initialized = true;
    }

    /// Replaces the identity after a successful login or registration.
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Drops the identity on logout. The snapshot stays initialized.
    pub fn clear(&mut self) {
        self.identity = None;
    }

    /// Snapshot for an already-resolved request, as built server-side where
    /// the session lookup has necessarily completed before evaluation.
    pub fn resolved(identity: Option<Identity>) -> Self {
        Self {
            identity,
            initialized: true,
        }
    }
}

/// RoleSet
///
/// The access requirement attached to a route. `Any` admits every
/// authenticated identity; `Only` admits the listed roles and nobody else.
/// The permissive historical behavior (any authenticated user passes a
/// role-restricted route) is explicitly NOT implemented.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleSet {
    Any,
    Only(&'static [Role]),
}

impl RoleSet {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            RoleSet::Any => true,
            RoleSet::Only(roles) => roles.contains(&role),
        }
    }
}

/// RouteName
///
/// Logical page identifiers. One entry per canonical page — the iteration
/// history of duplicate page components collapses to a single name here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteName {
    Main,
    Home,
    Schedule,
    Appointment,
    Profile,
    Login,
    Register,
    Reports,
    Admin,
    AccessDenied,
}

/// RouteEntry
///
/// Routing and guard metadata for one page. The page component itself is an
/// opaque collaborator; this layer only decides whether it may render.
/// Invariant: a non-`Any` role set implies `requires_auth`.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub name: RouteName,
    pub path: &'static str,
    pub requires_auth: bool,
    pub allowed_roles: RoleSet,
}

impl RouteEntry {
    const fn public(name: RouteName, path: &'static str) -> Self {
        Self {
            name,
            path,
            requires_auth: false,
            allowed_roles: RoleSet::Any,
        }
    }

    const fn authenticated(name: RouteName, path: &'static str) -> Self {
        Self {
            name,
            path,
            requires_auth: true,
            allowed_roles: RoleSet::Any,
        }
    }

    const fn restricted(name: RouteName, path: &'static str, roles: &'static [Role]) -> Self {
        Self {
            name,
            path,
            requires_auth: true,
            allowed_roles: RoleSet::Only(roles),
        }
    }
}

/// RouteTable
///
/// The static page registry. Construction validates the table and fails
/// fast: registering two entries under the same path is a configuration
/// error caught at startup, never at request time.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

/// Raised by `RouteTable::try_new` when two entries share a path.
#[derive(Debug, PartialEq)]
pub struct DuplicatePath(pub &'static str);

impl std::fmt::Display for DuplicatePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate route path registered: {}", self.0)
    }
}

impl std::error::Error for DuplicatePath {}

impl RouteTable {
    pub fn try_new(entries: Vec<RouteEntry>) -> Result<Self, DuplicatePath> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.path == entry.path) {
                return Err(DuplicatePath(entry.path));
            }
        }
        Ok(Self { entries })
    }

    /// The portal's full page map. Access requirements follow the product
    /// decision: role lists are enforced strictly.
    pub fn standard() -> Self {
        use Role::*;
        Self::try_new(vec![
            RouteEntry::public(RouteName::Main, "/"),
            RouteEntry::restricted(RouteName::Home, "/home", &[Patient, Admin]),
            RouteEntry::restricted(RouteName::Schedule, "/schedule", &[Patient, Doctor, Admin]),
            RouteEntry::restricted(RouteName::Appointment, "/appointment", &[Patient]),
            RouteEntry::authenticated(RouteName::Profile, "/profile"),
            RouteEntry::public(RouteName::Login, "/login"),
            RouteEntry::public(RouteName::Register, "/register"),
            RouteEntry::restricted(RouteName::Reports, "/reports", &[Manager, Admin]),
            RouteEntry::restricted(RouteName::Admin, "/admin", &[Admin]),
            RouteEntry::public(RouteName::AccessDenied, "/access-denied"),
        ])
        .expect("standard route table must not contain duplicate paths")
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn find(&self, path: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.path == path)
    }
}

/// Decision
///
/// Terminal guard output for one route-render request. `Loading` is the
/// pre-init placeholder state; `Redirect` carries the originally requested
/// path when the visitor should be returned there after logging in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "decision", rename_all = "snake_case")]
#[ts(export)]
pub enum Decision {
    Loading,
    Allow,
    Redirect {
        to: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
    },
}

pub const LOGIN_PATH: &str = "/login";
pub const ACCESS_DENIED_PATH: &str = "/access-denied";

/// evaluate
///
/// The access guard. Pure: no I/O, no mutation, never errors — the only
/// outputs are the three `Decision` variants.
///
/// Order of checks:
/// 1. Uninitialized session → `Loading` until the identity restore lands.
/// 2. Anonymous + route requires auth → redirect to login, origin captured.
/// 3. Authenticated + role not in the route's set → redirect to the
///    access-denied page (never a silent blank screen).
/// 4. Otherwise → `Allow`.
pub fn evaluate(session: &SessionSnapshot, route: &RouteEntry) -> Decision {
    if !session.initialized {
        return Decision::Loading;
    }

    match &session.identity {
        None => {
            if route.requires_auth {
                Decision::Redirect {
                    to: LOGIN_PATH.to_string(),
                    from: Some(route.path.to_string()),
                }
            } else {
                Decision::Allow
            }
        }
        Some(identity) => {
            if route.allowed_roles.allows(identity.role) {
                Decision::Allow
            } else {
                Decision::Redirect {
                    to: ACCESS_DENIED_PATH.to_string(),
                    from: None,
                }
            }
        }
    }
}
