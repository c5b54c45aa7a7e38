use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use thiserror::Error;

use crate::error::ApiError;

pub mod middleware;
pub mod password;
pub mod role;
pub mod token;

pub use role::{Role, UnknownRole};
pub use token::{Claims, TokenService};

/// Shared handle to the token service, pulled out of `AppState` via `FromRef`.
pub type TokenState = Arc<TokenService>;

/// AuthError
///
/// Everything that can go wrong between reading the `Authorization` header and holding a
/// verified set of claims. The display strings are the exact client-facing messages.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,

    #[error("Invalid token format")]
    MalformedHeader,

    #[error("Invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("Failed to generate token")]
    TokenCreation(#[source] jsonwebtoken::errors::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenCreation(source) => ApiError::internal("Failed to generate token", source),
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

/// AuthUser
///
/// The verified identity of the caller. The authentication middleware places one in the
/// request extensions after a successful token check; handlers on protected routes take it
/// as an argument to learn who is acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.sub,
            role: claims.role,
        }
    }
}

/// Reads the identity stored by [`middleware::authenticate`].
///
/// Rejects with 401 when the handler is mounted somewhere the middleware did not run.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authorization header required"))
    }
}
