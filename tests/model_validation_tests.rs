use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use municipal_portal::{
    Role,
    extract::Validate,
    models::{
        CreateNewsRequest, CreateProjectRequest, CreateServiceRequest, CreateTeamMemberRequest,
        CreateTrafficLightRequest, DashboardStats, Fine, LoginRequest, TrafficSummary,
        UpdateFineRequest, UpdateNewsRequest, UpdateServiceRequest, UpdateTeamMemberRequest, User,
        UserProfile,
    },
};
use serde_json::json;

fn rejection<T: Validate>(value: &T) -> Option<String> {
    value.validate().err().map(|err| {
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        err.client_message().to_string()
    })
}

// --- Login ---

#[test]
fn test_login_request_rules() {
    let login = |email: &str, password: &str| LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };

    assert_eq!(rejection(&login("admin@city.gov", "pw")), None);
    assert_eq!(rejection(&login("  admin@city.gov  ", "pw")), None);
    assert_eq!(
        rejection(&login("admin.city.gov", "pw")).as_deref(),
        Some("A valid email is required")
    );
    assert_eq!(
        rejection(&login("admin@city.gov", "")).as_deref(),
        Some("password is required")
    );
}

#[test]
fn test_login_request_requires_both_keys() {
    assert!(serde_json::from_value::<LoginRequest>(json!({ "email": "a@b.co" })).is_err());
    assert!(serde_json::from_value::<LoginRequest>(json!({ "password": "x" })).is_err());
}

#[test]
fn test_profile_never_carries_the_hash() {
    let user = User {
        id: 9,
        email: "clerk@city.gov".to_string(),
        password_hash: "$argon2id$v=19$secret".to_string(),
        role: Role::Editor,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let profile = serde_json::to_value(UserProfile::from(&user)).unwrap();
    assert_eq!(
        profile,
        json!({ "id": 9, "email": "clerk@city.gov", "role": "editor" })
    );
    assert!(!format!("{user:?}").contains("secret"));
}

// --- Create payloads ---

#[test]
fn test_required_text_fields() {
    let news = CreateNewsRequest {
        title: "Snow removal schedule".to_string(),
        content: " ".to_string(),
        tag: "city".to_string(),
    };
    assert_eq!(rejection(&news).as_deref(), Some("content is required"));

    let member = CreateTeamMemberRequest {
        name: String::new(),
        position: "Inspector".to_string(),
        experience: "2 years".to_string(),
        photo_url: None,
    };
    assert_eq!(rejection(&member).as_deref(), Some("name is required"));

    let service = CreateServiceRequest {
        title: "Towing".to_string(),
        description: "Vehicle release".to_string(),
        price: 0,
        category: "transport".to_string(),
        icon_url: None,
    };
    assert_eq!(rejection(&service), None);
}

#[test]
fn test_optional_fields_may_be_omitted() {
    let member: CreateTeamMemberRequest = serde_json::from_value(json!({
        "name": "Olga",
        "position": "Dispatcher",
        "experience": "7 years"
    }))
    .unwrap();
    assert_eq!(member.photo_url, None);

    let project: CreateProjectRequest = serde_json::from_value(json!({
        "title": "Smart crossings",
        "description": "Adaptive signal timing",
        "category": "traffic"
    }))
    .unwrap();
    assert_eq!(project.status_or_default(), "active");
}

#[test]
fn test_status_defaults() {
    let light = |status: Option<&str>| CreateTrafficLightRequest {
        address: "Main st. 4".to_string(),
        light_type: "pedestrian".to_string(),
        install_year: 2018,
        status: status.map(str::to_string),
    };

    assert_eq!(light(None).status_or_default(), "active");
    assert_eq!(light(Some("")).status_or_default(), "active");
    assert_eq!(light(Some("broken")).status_or_default(), "broken");
}

#[test]
fn test_wrong_types_fail_deserialization() {
    let wrong = json!({
        "date": "2024-01-01T00:00:00Z",
        "violations_total": "many",
        "orders_total": 1,
        "fines_amount_total": 1,
        "collected_amount_total": 1
    });
    assert!(serde_json::from_value::<municipal_portal::models::CreateFineRequest>(wrong).is_err());
}

// --- Update payloads ---

#[test]
fn test_partial_updates() {
    let empty: UpdateNewsRequest = serde_json::from_value(json!({})).unwrap();
    assert_eq!(rejection(&empty), None);
    assert_eq!(serde_json::to_value(&empty).unwrap(), json!({}));

    let blank = UpdateNewsRequest {
        tag: Some("".to_string()),
        ..UpdateNewsRequest::default()
    };
    assert_eq!(rejection(&blank).as_deref(), Some("tag cannot be empty"));

    let fine: UpdateFineRequest = serde_json::from_value(json!({ "orders_total": 4 })).unwrap();
    assert_eq!(fine.orders_total, Some(4));
    assert_eq!(fine.violations_total, None);
}

#[test]
fn test_nullable_url_distinguishes_null_from_absent() {
    let absent: UpdateServiceRequest = serde_json::from_value(json!({ "price": 10 })).unwrap();
    assert_eq!(absent.icon_url, None);

    let cleared: UpdateServiceRequest =
        serde_json::from_value(json!({ "icon_url": null })).unwrap();
    assert_eq!(cleared.icon_url, Some(None));
    assert_eq!(
        serde_json::to_value(&cleared).unwrap(),
        json!({ "icon_url": null })
    );

    let set: UpdateTeamMemberRequest =
        serde_json::from_value(json!({ "photo_url": "https://cdn.city.gov/a.png" })).unwrap();
    assert_eq!(
        set.photo_url,
        Some(Some("https://cdn.city.gov/a.png".to_string()))
    );
}

// --- Aggregates ---

#[test]
fn test_dashboard_stats_from_latest() {
    let fine = Fine {
        id: 1,
        date: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
        violations_total: 11,
        orders_total: 7,
        fines_amount_total: 5500,
        collected_amount_total: 4000,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let stats = DashboardStats::from_latest(Some(&fine), None, 3);
    assert_eq!(
        serde_json::to_value(&stats).unwrap(),
        json!({
            "violations_total": 11,
            "orders_total": 7,
            "fines_amount_total": 5500,
            "collected_amount_total": 4000,
            "traffic_lights_active": 3
        })
    );
}

#[test]
fn test_traffic_summary_keys() {
    let mut summary = TrafficSummary::default();
    summary.light_types.insert("vehicle".to_string(), 2);
    summary.install_years.insert(2020, 2);

    assert_eq!(
        serde_json::to_value(&summary).unwrap(),
        json!({ "light_types": { "vehicle": 2 }, "install_years": { "2020": 2 } })
    );
}
