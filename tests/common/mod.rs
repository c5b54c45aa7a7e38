#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use municipal_portal::{
    AppConfig, AppState, InMemoryRepository, Role, auth::password::hash_password,
    models::{NewUser, User},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct-horse-battery";

pub const ADMIN_EMAIL: &str = "admin@city.gov";
pub const EDITOR_EMAIL: &str = "editor@city.gov";
pub const DISABLED_EMAIL: &str = "former@city.gov";

// Ids assigned by the in-memory store in seeding order.
pub const ADMIN_ID: i32 = 1;
pub const EDITOR_ID: i32 = 2;
pub const DISABLED_ID: i32 = 3;

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..AppConfig::default()
    }
}

/// An admin, an active editor and a disabled editor, all with [`PASSWORD`].
pub fn seeded_repo() -> InMemoryRepository {
    let hash = hash_password(PASSWORD).unwrap();
    let account = |email: &str, role: Role, is_active: bool| NewUser {
        email: email.to_string(),
        password_hash: hash.clone(),
        role,
        is_active,
    };

    InMemoryRepository::new()
        .with_user(account(ADMIN_EMAIL, Role::Admin, true))
        .with_user(account(EDITOR_EMAIL, Role::Editor, true))
        .with_user(account(DISABLED_EMAIL, Role::Editor, false))
}

pub fn state_with(repo: InMemoryRepository) -> AppState {
    AppState::new(Arc::new(repo), test_config())
}

pub fn user(id: i32, email: &str, role: Role) -> User {
    User {
        id,
        email: email.to_string(),
        password_hash: String::new(),
        role,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn token_for(state: &AppState, role: Role) -> String {
    let user = match role {
        Role::Admin => user(ADMIN_ID, ADMIN_EMAIL, Role::Admin),
        Role::Editor => user(EDITOR_ID, EDITOR_EMAIL, Role::Editor),
    };
    state.tokens.issue(&user).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Drives one request through the router; an empty body comes back as `Value::Null`.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
