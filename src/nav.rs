use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::Role;

/// NavItem
///
/// One visible menu link. Derived data — recomputed from the current
/// identity on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavItem {
    pub path: String,
    pub label: String,
}

fn item(path: &str, label: &str) -> NavItem {
    NavItem {
        path: path.to_string(),
        label: label.to_string(),
    }
}

/// Menu entries per role. A lookup table rather than a switch scattered
/// across pages, so totality can be checked once at startup instead of
/// falling through silently at render time.
const ROLE_MENU: &[(Role, &[(&str, &str)])] = &[
    (
        Role::Patient,
        &[
            ("/home", "Home"),
            ("/schedule", "Schedule"),
            ("/appointment", "Book appointment"),
            ("/profile", "My profile"),
        ],
    ),
    // The patient home page is closed to doctors and managers, so their
    // "Home" links land on the public landing page instead.
    (
        Role::Doctor,
        &[
            ("/", "Home"),
            ("/schedule", "My schedule"),
            ("/profile", "My profile"),
        ],
    ),
    (
        Role::Manager,
        &[
            ("/", "Home"),
            ("/reports", "Reports"),
            ("/profile", "My profile"),
        ],
    ),
    (
        Role::Admin,
        &[
            ("/home", "Home"),
            ("/admin", "Admin panel"),
            ("/reports", "Reports"),
            ("/profile", "My profile"),
        ],
    ),
];

const ANONYMOUS_MENU: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/login", "Sign in"),
    ("/register", "Register"),
];

/// compose
///
/// The navigation composer. Pure and total: every role — anonymous
/// included — maps to a defined, non-empty, order-stable menu.
pub fn compose(role: Option<Role>) -> Vec<NavItem> {
    let raw = match role {
        None => ANONYMOUS_MENU,
        Some(role) => {
            ROLE_MENU
                .iter()
                .find(|(r, _)| *r == role)
                .map(|(_, menu)| *menu)
                // Unreachable once `verify_totality` has passed at startup;
                // anonymous links are still a safe fallback.
                .unwrap_or(ANONYMOUS_MENU)
        }
    };
    raw.iter().map(|(path, label)| item(path, label)).collect()
}

/// verify_totality
///
/// Startup check that the menu table covers every role with a non-empty
/// sequence. Returns the first uncovered role, if any; the caller fails
/// fast before serving traffic.
pub fn verify_totality() -> Result<(), Role> {
    for role in Role::ALL {
        let covered = ROLE_MENU
            .iter()
            .any(|(r, menu)| r == role && !menu.is_empty());
        if !covered {
            return Err(*role);
        }
    }
    Ok(())
}
