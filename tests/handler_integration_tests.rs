mod common;

use axum::{extract::State, http::StatusCode};
use chrono::{TimeZone, Utc};
use common::*;
use municipal_portal::{
    InMemoryRepository, Role,
    auth::AuthUser,
    extract::{JsonBody, RecordId},
    handlers::{auth, evacuation_routes, evacuations, fines, services, stats, traffic_lights},
    models::{
        CreateEvacuationRequest, CreateEvacuationRouteRequest, CreateFineRequest,
        CreateServiceRequest, CreateTrafficLightRequest, LoginRequest, UpdateServiceRequest,
    },
    repository::RepositoryState,
};
use std::{sync::Arc, time::Instant};

// --- Helpers ---

fn repo() -> RepositoryState {
    Arc::new(InMemoryRepository::new())
}

fn failing_repo() -> RepositoryState {
    Arc::new(InMemoryRepository::failing())
}

fn editor() -> AuthUser {
    AuthUser {
        id: EDITOR_ID,
        email: EDITOR_EMAIL.to_string(),
        role: Role::Editor,
    }
}

fn fine_on(year: i32, month: u32, violations: i32) -> CreateFineRequest {
    CreateFineRequest {
        date: Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap(),
        violations_total: violations,
        orders_total: violations / 2,
        fines_amount_total: violations * 500,
        collected_amount_total: violations * 400,
    }
}

fn service_request(title: &str) -> CreateServiceRequest {
    CreateServiceRequest {
        title: title.to_string(),
        description: "Issued within five working days".to_string(),
        price: 1500,
        category: "permits".to_string(),
        icon_url: None,
    }
}

fn login_request(email: &str, password: &str) -> JsonBody<LoginRequest> {
    JsonBody(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

// --- Reads ---

#[tokio::test]
async fn test_list_fines_newest_first() {
    let repo = repo();
    repo.create_fine(fine_on(2024, 1, 10)).await.unwrap();
    repo.create_fine(fine_on(2024, 3, 30)).await.unwrap();
    repo.create_fine(fine_on(2024, 2, 20)).await.unwrap();

    let body = fines::list_fines(State(repo)).await.unwrap().0;

    let violations: Vec<i64> = body["fines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|fine| fine["violations_total"].as_i64().unwrap())
        .collect();
    assert_eq!(violations, vec![30, 20, 10]);
}

#[tokio::test]
async fn test_empty_lists_are_arrays() {
    let body = services::list_services(State(repo())).await.unwrap().0;
    assert_eq!(body["services"], serde_json::json!([]));
}

#[tokio::test]
async fn test_get_missing_record() {
    let err = fines::get_fine(State(repo()), RecordId(7)).await.unwrap_err();

    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(err.client_message(), "Fine not found");
}

#[tokio::test]
async fn test_evacuation_routes_sorted_by_year_descending() {
    let repo = repo();
    for (year, month) in [(2023, "May"), (2024, "January"), (2023, "April")] {
        let (status, _) = evacuation_routes::create_evacuation_route(
            editor(),
            State(repo.clone()),
            JsonBody(CreateEvacuationRouteRequest {
                year,
                month: month.to_string(),
                route: "Depot - Central square - Depot".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }

    let body = evacuation_routes::list_evacuation_routes(State(repo))
        .await
        .unwrap()
        .0;
    let years: Vec<i64> = body["evacuation_routes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|route| route["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2024, 2023, 2023]);
}

// --- Writes ---

#[tokio::test]
async fn test_create_returns_201_with_assigned_id() {
    let repo = repo();

    let (status, body) = services::create_service(
        editor(),
        State(repo.clone()),
        JsonBody(service_request("Parking permit")),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["service"]["id"], 1);
    assert_eq!(body["service"]["title"], "Parking permit");
    assert!(body["service"]["icon_url"].is_null());
    assert_eq!(repo.list_services().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_touches_only_supplied_fields() {
    let repo = repo();
    let created = repo.create_service(service_request("Parking permit")).await.unwrap();

    let body = services::update_service(
        editor(),
        State(repo.clone()),
        RecordId(created.id),
        JsonBody(UpdateServiceRequest {
            price: Some(2000),
            icon_url: Some(Some("https://cdn.city.gov/icons/parking.svg".to_string())),
            ..UpdateServiceRequest::default()
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(body["message"], "Service updated successfully");

    let stored = repo.get_service(created.id).await.unwrap().unwrap();
    assert_eq!(stored.price, 2000);
    assert_eq!(stored.title, created.title);
    assert_eq!(stored.category, created.category);
    assert_eq!(
        stored.icon_url.as_deref(),
        Some("https://cdn.city.gov/icons/parking.svg")
    );
    assert!(stored.updated_at >= created.updated_at);
    assert_eq!(stored.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_missing_record() {
    let err = services::update_service(
        editor(),
        State(repo()),
        RecordId(3),
        JsonBody(UpdateServiceRequest::default()),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(err.client_message(), "Service not found");
}

#[tokio::test]
async fn test_delete_removes_record() {
    let repo = repo();
    let created = repo.create_fine(fine_on(2024, 1, 5)).await.unwrap();

    let status = fines::delete_fine(editor(), State(repo.clone()), RecordId(created.id))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(repo.get_fine(created.id).await.unwrap().is_none());

    let err = fines::delete_fine(editor(), State(repo), RecordId(created.id))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traffic_light_status_default_and_override() {
    let repo = repo();
    let request = |status: Option<&str>| CreateTrafficLightRequest {
        address: "Lenina st. 1".to_string(),
        light_type: "vehicle".to_string(),
        install_year: 2022,
        status: status.map(str::to_string),
    };

    let (_, defaulted) =
        traffic_lights::create_traffic_light(editor(), State(repo.clone()), JsonBody(request(None)))
            .await
            .unwrap();
    let (_, explicit) = traffic_lights::create_traffic_light(
        editor(),
        State(repo),
        JsonBody(request(Some("maintenance"))),
    )
    .await
    .unwrap();

    assert_eq!(defaulted["traffic_light"]["status"], "active");
    assert_eq!(explicit["traffic_light"]["status"], "maintenance");
}

// --- Aggregates ---

#[tokio::test]
async fn test_stats_use_latest_reports() {
    let repo = repo();
    repo.create_fine(fine_on(2024, 1, 10)).await.unwrap();
    repo.create_fine(fine_on(2024, 6, 60)).await.unwrap();
    let (status, _) = evacuations::create_evacuation(
        editor(),
        State(repo.clone()),
        JsonBody(CreateEvacuationRequest {
            date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            evacuators_count: 4,
            trips_count: 31,
            evacuations_count: 27,
            fine_lot_income: 98000,
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let body = stats::get_stats(State(repo)).await.unwrap().0;
    assert_eq!(body["stats"]["violations_total"], 60);
    assert_eq!(body["stats"]["evacuators_count"], 4);
    assert_eq!(body["stats"]["fine_lot_income"], 98000);
    assert_eq!(body["stats"]["traffic_lights_active"], 0);
}

#[tokio::test]
async fn test_stats_on_empty_store() {
    let body = stats::get_stats(State(repo())).await.unwrap().0;
    assert_eq!(body["stats"], serde_json::json!({ "traffic_lights_active": 0 }));

    let body = stats::get_traffic(State(repo())).await.unwrap().0;
    assert_eq!(
        body["traffic"],
        serde_json::json!({ "light_types": {}, "install_years": {} })
    );
}

// --- Persistence failures ---

#[tokio::test]
async fn test_failing_repository_maps_to_500() {
    let err = fines::list_fines(State(failing_repo())).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.client_message(), "Failed to get fines");

    let err = services::create_service(
        editor(),
        State(failing_repo()),
        JsonBody(service_request("Lost")),
    )
    .await
    .unwrap_err();
    assert_eq!(err.client_message(), "Failed to create service");

    let err = fines::delete_fine(editor(), State(failing_repo()), RecordId(1))
        .await
        .unwrap_err();
    assert_eq!(err.client_message(), "Failed to delete fine");

    let err = stats::get_traffic(State(failing_repo())).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_is_static() {
    let body = stats::health().await.0;
    assert_eq!(body["status"], "ok");
}

// --- Login ---

#[tokio::test]
async fn test_login_trims_email() {
    let state = state_with(seeded_repo());

    let response = auth::editor_login(
        State(state.repo.clone()),
        State(state.tokens.clone()),
        login_request(&format!("  {EDITOR_EMAIL} "), PASSWORD),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(response.user.id, EDITOR_ID);
    assert_eq!(response.user.role, Role::Editor);
    let claims = state.tokens.validate(&response.token).unwrap();
    assert_eq!(claims.sub, EDITOR_EMAIL);
}

#[tokio::test]
async fn test_login_outcomes() {
    let state = state_with(seeded_repo());
    let attempt = |email: &'static str, password: &'static str| {
        auth::admin_login(
            State(state.repo.clone()),
            State(state.tokens.clone()),
            login_request(email, password),
        )
    };

    let err = attempt(ADMIN_EMAIL, "nope").await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

    let err = attempt(EDITOR_EMAIL, PASSWORD).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(err.client_message(), "Admin access required");

    let err = attempt(DISABLED_EMAIL, PASSWORD).await.unwrap_err();
    assert_eq!(err.client_message(), "Account is disabled");

    assert!(attempt(ADMIN_EMAIL, PASSWORD).await.is_ok());
}

#[tokio::test]
async fn test_unknown_email_costs_a_hash_verification() {
    let state = state_with(seeded_repo());
    let timed = |email: &'static str| {
        let state = state.clone();
        async move {
            let started = Instant::now();
            let err = auth::login(
                State(state.repo),
                State(state.tokens),
                login_request(email, "wrong-password"),
            )
            .await
            .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.client_message(), "Invalid credentials");
            started.elapsed()
        }
    };

    let known = timed(ADMIN_EMAIL).await;
    let unknown = timed("nobody@city.gov").await;

    // Skipping Argon2 would make the unknown path orders of magnitude faster.
    assert!(
        unknown * 10 >= known,
        "unknown email took {unknown:?}, known email took {known:?}"
    );
}

#[tokio::test]
async fn test_login_with_failing_repository() {
    let state = state_with(InMemoryRepository::failing());

    let err = auth::login(
        State(state.repo.clone()),
        State(state.tokens.clone()),
        login_request(ADMIN_EMAIL, PASSWORD),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.client_message(), "Login failed");
}
