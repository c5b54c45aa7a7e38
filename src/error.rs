use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;

/// ApiResult
///
/// Shorthand used by every handler and middleware that can reject a request.
pub type ApiResult<T> = Result<T, ApiError>;

/// ApiError
///
/// The single error type surfaced to HTTP clients. Each variant maps to one status code
/// and renders as `{"error": "<message>"}`.
///
/// `Internal` keeps the underlying failure in `detail` for the server log only; the client
/// never sees it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed JSON, missing or blank required fields, unparsable path ids.
    #[error("{0}")]
    BadRequest(String),

    /// Missing, malformed, invalid or expired credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but the role does not satisfy the route policy.
    #[error("{0}")]
    Forbidden(String),

    /// Lookup by id found no row.
    #[error("{0}")]
    NotFound(String),

    /// Persistence, signing or hashing failure.
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wraps an internal failure. `message` is what the client sees, `source` is only logged.
    pub fn internal(message: impl Into<String>, source: impl Display) -> Self {
        Self::Internal {
            message: message.into(),
            detail: source.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the response body.
    pub fn client_message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message) => message,
            Self::Internal { message, .. } => message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Internal { message, detail } => {
                tracing::error!(status = %status, detail = %detail, "{}", message);
            }
            other => {
                tracing::debug!(status = %status, error = %other, "request rejected");
            }
        }

        let body = Json(json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}
