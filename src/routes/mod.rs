/// Router Module Index
///
/// Routing is split by access tier. Access control is attached as layers on the tier's
/// router, never checked inside handlers.

/// Read-only routes, no authentication.
pub mod public;

/// Login endpoints.
pub mod auth;

/// Full CRUD behind token authentication and a role gate; mounted once per role.
pub mod protected;
