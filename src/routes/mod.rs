/// Router Module Index
///
/// Organizes the portal's routing into security-segregated modules so
/// access control is applied explicitly at the module level rather than
/// per-handler by convention.

/// Routes accessible to anyone: auth gateway, schedule browsing, health.
pub mod public;

/// Routes behind the `AuthUser` extractor middleware: profile, booking,
/// the doctor worklist.
pub mod authenticated;

/// Report routes, restricted to the manager and admin roles inside the
/// handlers.
pub mod reports;

/// Raw-table viewer, restricted to the admin role inside the handlers.
pub mod admin;

/// Page routes generated from the route table and guarded by the access
/// guard.
pub mod pages;
