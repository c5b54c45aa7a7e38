use crate::{AppState, handlers::auth};
use axum::{Router, routing::post};

/// Login endpoints, mounted under `/api/auth`. Unauthenticated by nature.
///
/// The admin and editor variants reject accounts whose role is below the audience even
/// when the password is right; `/login` accepts any active account.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(auth::admin_login))
        .route("/editor/login", post(auth::editor_login))
        .route("/login", post(auth::login))
}
