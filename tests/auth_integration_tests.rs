mod common;

use axum::{
    Router,
    extract::FromRequestParts,
    http::{HeaderValue, Method, Request, StatusCode, header, request::Parts},
    middleware,
    routing::get,
};
use chrono::{Duration, Utc};
use common::*;
use municipal_portal::{
    ApiError, Role, TokenService,
    auth::{
        AuthError, AuthUser, UnknownRole,
        middleware::{authenticate, require_role},
        token::bearer_token,
    },
};
use std::sync::Arc;

// --- Helpers ---

fn service() -> TokenService {
    TokenService::new(TEST_SECRET)
}

fn admin() -> municipal_portal::models::User {
    user(ADMIN_ID, ADMIN_EMAIL, Role::Admin)
}

fn request_parts(method: Method, uri: &str) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

async fn whoami(user: AuthUser) -> String {
    format!("{}:{}", user.id, user.role)
}

/// A single route behind the same two layers the protected routers use.
fn gated(required: Role) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(required, require_role))
        .route_layer(middleware::from_fn_with_state(
            Arc::new(service()),
            authenticate,
        ))
}

// --- Token service ---

#[test]
fn test_issue_then_validate_round_trip() {
    let tokens = service();
    let token = tokens.issue(&admin()).unwrap();

    let claims = tokens.validate(&token).unwrap();
    assert_eq!(claims.user_id, ADMIN_ID);
    assert_eq!(claims.sub, ADMIN_EMAIL);
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let token = TokenService::new("not-the-secret").issue(&admin()).unwrap();

    let err = service().validate(&token).unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)));
    assert_eq!(err.to_string(), "Invalid token");
}

#[test]
fn test_tampered_token_is_rejected() {
    let tokens = service();
    let token = tokens.issue(&admin()).unwrap();

    // Swap the payload for the one of an editor token: the signature no longer matches.
    let editor_token = tokens
        .issue(&user(EDITOR_ID, EDITOR_EMAIL, Role::Editor))
        .unwrap();
    let mut parts: Vec<&str> = token.split('.').collect();
    let editor_payload = editor_token.split('.').nth(1).unwrap();
    parts[1] = editor_payload;
    let forged = parts.join(".");

    assert!(matches!(
        tokens.validate(&forged),
        Err(AuthError::InvalidToken(_))
    ));
}

#[test]
fn test_expired_token_is_rejected() {
    let tokens = service();
    let token = tokens
        .issue_at(&admin(), Utc::now() - Duration::hours(TokenService::LIFETIME_HOURS + 1))
        .unwrap();

    assert!(matches!(
        tokens.validate(&token),
        Err(AuthError::InvalidToken(_))
    ));
}

#[test]
fn test_token_rejected_seconds_after_expiry() {
    let tokens = service();
    let token = tokens
        .issue_at(
            &admin(),
            Utc::now() - Duration::hours(TokenService::LIFETIME_HOURS) - Duration::seconds(5),
        )
        .unwrap();

    assert!(matches!(
        tokens.validate(&token),
        Err(AuthError::InvalidToken(_))
    ));
}

#[test]
fn test_token_close_to_expiry_is_still_valid() {
    let tokens = service();
    let token = tokens
        .issue_at(&admin(), Utc::now() - Duration::hours(TokenService::LIFETIME_HOURS - 1))
        .unwrap();

    assert!(tokens.validate(&token).is_ok());
}

// --- Header parsing ---

#[test]
fn test_bearer_token_shapes() {
    assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");

    for value in ["", "Bearer", "Bearer ", "bearer abc", "Basic abc", "Bearer a b", "abc"] {
        assert!(
            matches!(bearer_token(value), Err(AuthError::MalformedHeader)),
            "{value:?} should be malformed"
        );
    }
}

#[test]
fn test_authenticate_header_order_of_checks() {
    let tokens = service();

    assert!(matches!(
        tokens.authenticate_header(None),
        Err(AuthError::MissingHeader)
    ));

    let malformed = HeaderValue::from_static("Token abc");
    assert!(matches!(
        tokens.authenticate_header(Some(&malformed)),
        Err(AuthError::MalformedHeader)
    ));

    let garbage = HeaderValue::from_static("Bearer not-a-jwt");
    assert!(matches!(
        tokens.authenticate_header(Some(&garbage)),
        Err(AuthError::InvalidToken(_))
    ));

    let token = tokens.issue(&admin()).unwrap();
    let valid = HeaderValue::from_str(&bearer(&token)).unwrap();
    let claims = tokens.authenticate_header(Some(&valid)).unwrap();
    assert_eq!(claims.user_id, ADMIN_ID);
}

#[test]
fn test_auth_errors_map_to_401_with_exact_messages() {
    let cases = [
        (AuthError::MissingHeader, "Authorization header required"),
        (AuthError::MalformedHeader, "Invalid token format"),
    ];

    for (err, message) in cases {
        let api: ApiError = err.into();
        assert_eq!(api.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(api.client_message(), message);
    }

    let invalid = service().validate("junk").unwrap_err();
    let api: ApiError = invalid.into();
    assert_eq!(api.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(api.client_message(), "Invalid token");
}

// --- AuthUser extractor ---

#[tokio::test]
async fn test_auth_user_read_from_extensions() {
    let mut parts = request_parts(Method::GET, "/");
    parts.extensions.insert(AuthUser {
        id: EDITOR_ID,
        email: EDITOR_EMAIL.to_string(),
        role: Role::Editor,
    });

    let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.id, EDITOR_ID);
    assert_eq!(user.role, Role::Editor);
}

#[tokio::test]
async fn test_auth_user_missing_is_unauthorized() {
    let mut parts = request_parts(Method::GET, "/");

    let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

// --- Middleware ---

#[tokio::test]
async fn test_gate_passes_identity_to_handler() {
    let token = service().issue(&admin()).unwrap();

    let response = tower::ServiceExt::oneshot(
        gated(Role::Admin),
        empty_request("GET", "/whoami", Some(&token)),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], format!("{ADMIN_ID}:admin").as_bytes());
}

#[tokio::test]
async fn test_editor_gate_message() {
    let app = Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(Role::Admin, require_role))
        .route_layer(middleware::from_fn_with_state(Arc::new(service()), authenticate));
    let token = service()
        .issue(&user(EDITOR_ID, EDITOR_EMAIL, Role::Editor))
        .unwrap();

    let (status, body) = send(&app, empty_request("GET", "/whoami", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin permissions required");

    let response = tower::ServiceExt::oneshot(
        gated(Role::Editor),
        empty_request("GET", "/whoami", Some(&token)),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_role_gate_without_authentication() {
    let app = Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(Role::Editor, require_role));

    let (status, body) = send(&app, empty_request("GET", "/whoami", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Role not found in context");
}

#[tokio::test]
async fn test_authenticate_rejects_before_handler() {
    let request = Request::builder()
        .uri("/whoami")
        .header(header::AUTHORIZATION, "Bearer")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, body) = send(&gated(Role::Editor), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token format");
}

// --- Role ---

#[test]
fn test_role_hierarchy() {
    assert!(Role::Admin.permits(Role::Admin));
    assert!(Role::Admin.permits(Role::Editor));
    assert!(Role::Editor.permits(Role::Editor));
    assert!(!Role::Editor.permits(Role::Admin));
    assert!(Role::Admin > Role::Editor);
}

#[test]
fn test_role_parsing_is_closed() {
    assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
    assert_eq!("editor".parse::<Role>(), Ok(Role::Editor));
    assert_eq!(
        "Admin".parse::<Role>(),
        Err(UnknownRole("Admin".to_string()))
    );
    assert!(Role::try_from("superuser".to_string()).is_err());

    assert_eq!(serde_json::to_string(&Role::Editor).unwrap(), "\"editor\"");
    assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
}
