use axum::{Json, extract::State};

use crate::{
    auth::{
        Role, TokenState,
        password::{DUMMY_HASH, verify_password},
    },
    error::{ApiError, ApiResult},
    extract::JsonBody,
    models::{LoginRequest, LoginResponse, UserProfile},
    repository::RepositoryState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// admin_login
///
/// Issues a token only to active admin accounts. Editors with correct credentials get a
/// 403 rather than a token they could not use here.
#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Malformed body or email"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled or not an admin")
    )
)]
pub async fn admin_login(
    State(repo): State<RepositoryState>,
    State(tokens): State<TokenState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    login_as(repo, tokens, req, Some(Role::Admin)).await
}

/// editor_login
///
/// Same as `admin_login` with the editor audience; admins pass as well.
#[utoipa::path(
    post,
    path = "/api/auth/editor/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled")
    )
)]
pub async fn editor_login(
    State(repo): State<RepositoryState>,
    State(tokens): State<TokenState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    login_as(repo, tokens, req, Some(Role::Editor)).await
}

/// login
///
/// Role-agnostic login: any active account gets a token carrying its own role.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled")
    )
)]
pub async fn login(
    State(repo): State<RepositoryState>,
    State(tokens): State<TokenState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    login_as(repo, tokens, req, None).await
}

fn audience_denied(audience: Role) -> ApiError {
    match audience {
        Role::Admin => ApiError::forbidden("Admin access required"),
        Role::Editor => ApiError::forbidden("Editor access required"),
    }
}

/// Shared login flow. The password is verified before the account's active flag or role
/// is looked at.
async fn login_as(
    repo: RepositoryState,
    tokens: TokenState,
    req: LoginRequest,
    audience: Option<Role>,
) -> ApiResult<Json<LoginResponse>> {
    let email = req.email.trim().to_string();

    let user = repo
        .get_user_by_email(&email)
        .await
        .map_err(|err| ApiError::internal("Login failed", err))?;

    // CPU bound. Unknown emails still pay for one verification.
    let stored_hash = user
        .as_ref()
        .map_or(DUMMY_HASH, |user| user.password_hash.as_str())
        .to_string();
    let password_ok =
        tokio::task::spawn_blocking(move || verify_password(&req.password, &stored_hash))
            .await
            .map_err(|err| ApiError::internal("Login failed", err))?;

    let Some(user) = user else {
        tracing::warn!(email = %email, "login rejected: unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !password_ok {
        tracing::warn!(user_id = user.id, "login rejected: password mismatch");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    if !user.is_active {
        tracing::warn!(user_id = user.id, "login rejected: account disabled");
        return Err(ApiError::forbidden("Account is disabled"));
    }

    if let Some(audience) = audience {
        if !user.role.permits(audience) {
            tracing::warn!(
                user_id = user.id,
                role = %user.role,
                audience = %audience,
                "login rejected: role below audience"
            );
            return Err(audience_denied(audience));
        }
    }

    let token = tokens.issue(&user)?;

    tracing::info!(user_id = user.id, role = %user.role, "login succeeded");
    Ok(Json(LoginResponse {
        token,
        user: UserProfile::from(&user),
    }))
}
