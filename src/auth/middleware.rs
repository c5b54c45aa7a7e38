use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use super::{AuthUser, Role, TokenState};
use crate::error::ApiError;

/// authenticate
///
/// Guards every protected route. Validates the bearer token and, on success, stores the
/// resulting [`AuthUser`] in the request extensions for the role gate and the handler.
///
/// Rejections (all 401): missing header, header not shaped `Bearer <token>`, token with a
/// bad signature, wrong shape or past its expiry.
pub async fn authenticate(
    State(tokens): State<TokenState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = tokens.authenticate_header(request.headers().get(header::AUTHORIZATION))?;
    let user = AuthUser::from(claims);

    tracing::debug!(user_id = user.id, role = %user.role, "request authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// require_role
///
/// Second gate, mounted inside `authenticate`. The required role is the layer's state, so
/// the same function serves both the editor and the admin surface.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return Err(ApiError::unauthorized("Role not found in context"));
    };

    if !user.role.permits(required) {
        tracing::warn!(
            user_id = user.id,
            role = %user.role,
            required = %required,
            "role check failed"
        );
        return Err(ApiError::forbidden(format!(
            "{} permissions required",
            required.gate_label()
        )));
    }

    Ok(next.run(request).await)
}
