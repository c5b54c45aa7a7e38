use axum::http::HeaderValue;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::{AuthError, Role};
use crate::models::User;

/// Claims
///
/// Payload of every bearer token issued by this service. Tokens are self-contained: nothing
/// about them is stored server-side, so validity is purely a matter of signature and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: Role,
    /// Subject (sub): the user's email.
    pub sub: String,
    /// Issued At (iat), seconds since the epoch.
    pub iat: i64,
    /// Expiration Time (exp), seconds since the epoch.
    pub exp: i64,
}

/// TokenService
///
/// Issues and validates HS256-signed identity tokens with a fixed 24 hour lifetime.
/// Built once at startup from the configured secret and shared through `AppState`.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    pub const LIFETIME_HOURS: i64 = 24;

    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // A token is dead the second `exp` passes.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime: Duration::hours(Self::LIFETIME_HOURS),
        }
    }

    /// Issues a token for `user`, valid from now for the full lifetime.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            user_id: user.id,
            role: user.role,
            sub: user.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::TokenCreation)
    }

    /// Verifies signature and expiry and decodes the claims.
    ///
    /// Bad signatures, malformed tokens, claims of the wrong shape and expired tokens all
    /// collapse into `AuthError::InvalidToken`.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }

    /// Runs the full header check: presence, `Bearer <token>` shape, then token validation.
    pub fn authenticate_header(&self, header: Option<&HeaderValue>) -> Result<Claims, AuthError> {
        let value = header.ok_or(AuthError::MissingHeader)?;
        let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
        let token = bearer_token(value)?;
        self.validate(token)
    }
}

/// Splits an `Authorization` header value into its token, accepting exactly `Bearer <token>`.
pub fn bearer_token(value: &str) -> Result<&str, AuthError> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
