use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Validate
///
/// Field-level checks that run after a request body deserialized successfully. Bodies with
/// nothing to check beyond their types keep the default.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// JsonBody
///
/// Drop-in replacement for `axum::Json` on the request side. Every rejection (wrong content
/// type, malformed JSON, missing field, wrong type) and every failed [`Validate`] check becomes
/// a 400 with the standard `{"error": ...}` body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        value.validate()?;
        Ok(JsonBody(value))
    }
}

/// RecordId
///
/// The `{id}` path segment of a single-record route. Anything that is not a positive integer
/// is rejected with 400 `"Invalid ID"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i32);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid ID"))?;

        match raw.parse::<i32>() {
            Ok(id) if id > 0 => Ok(RecordId(id)),
            _ => Err(ApiError::bad_request("Invalid ID")),
        }
    }
}

/// Rejects a required text field that is empty or only whitespace.
pub fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    Ok(())
}

/// Same as [`require_text`] for a field of a partial update: absent is fine, blank is not.
pub fn reject_blank(field: &str, value: Option<&String>) -> Result<(), ApiError> {
    match value {
        Some(value) if value.trim().is_empty() => {
            Err(ApiError::bad_request(format!("{field} cannot be empty")))
        }
        _ => Ok(()),
    }
}

/// Loose address check: one `@`, something on both sides, a dot in the domain, no spaces.
pub fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("admin@city.gov"));
        assert!(looks_like_email("a.b+c@sub.example.org"));

        assert!(!looks_like_email("admin"));
        assert!(!looks_like_email("@city.gov"));
        assert!(!looks_like_email("admin@"));
        assert!(!looks_like_email("admin@city"));
        assert!(!looks_like_email("admin@@city.gov"));
        assert!(!looks_like_email("ad min@city.gov"));
        assert!(!looks_like_email("admin@city.gov."));
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text("title", "Road works").is_ok());
        assert!(require_text("title", "   ").is_err());

        let blank = "  ".to_string();
        let filled = "x".to_string();
        assert!(reject_blank("title", None).is_ok());
        assert!(reject_blank("title", Some(&filled)).is_ok());
        assert!(reject_blank("title", Some(&blank)).is_err());
    }
}
