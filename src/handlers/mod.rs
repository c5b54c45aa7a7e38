//! Request handlers, one module per resource.
//!
//! Every data handler performs exactly one repository call. Read handlers are mounted on
//! the public router; the mutating ones are mounted behind authentication on both the
//! editor and the admin surface.

use crate::{error::ApiError, repository::RepositoryError};

pub mod auth;
pub mod evacuation_routes;
pub mod evacuations;
pub mod fines;
pub mod news;
pub mod projects;
pub mod services;
pub mod stats;
pub mod team;
pub mod traffic_lights;
pub mod vacancies;

/// Maps a persistence failure to a 500 carrying `message`; the cause is only logged.
pub(crate) fn repo_error(message: &'static str) -> impl FnOnce(RepositoryError) -> ApiError {
    move |err| ApiError::internal(message, err)
}
