//! Runs against a live Postgres described by the usual `DB_*` variables (or `.env`).
//!
//! `cargo test -- --ignored` with a scratch database; the schema is applied on setup.

use chrono::{TimeZone, Utc};
use municipal_portal::{
    AppConfig, PostgresRepository, Role,
    auth::password::hash_password,
    models::{
        CreateEvacuationRouteRequest, CreateFineRequest, CreateTeamMemberRequest,
        CreateTrafficLightRequest, CreateVacancyRequest, NewUser, UpdateTeamMemberRequest,
        UpdateTrafficLightRequest, UpdateVacancyRequest,
    },
    repository::{Repository, RepositoryError},
};
use serial_test::serial;
use sqlx::postgres::PgPoolOptions;

// --- Test Context and Setup ---

async fn setup() -> PostgresRepository {
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("invalid test configuration");

    // Apply the schema on a throwaway pool, then hand out the real repository.
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&format!(
            "postgres://{}:{}@{}:{}/{}",
            config.db_user, config.db_password, config.db_host, config.db_port, config.db_name
        ))
        .await
        .expect("Failed to connect to database for integration tests.");
    sqlx::raw_sql(include_str!("../db/schema.sql"))
        .execute(&pool)
        .await
        .expect("Failed to apply db/schema.sql");
    pool.close().await;

    PostgresRepository::connect(&config)
        .await
        .expect("Failed to open repository pool")
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

// --- Tests ---

#[tokio::test]
#[ignore = "requires a running Postgres"]
#[serial]
async fn test_user_round_trip_and_duplicate_email() {
    let repo = setup().await;
    let email = format!("{}@city.gov", unique("editor"));

    let new_user = NewUser {
        email: email.clone(),
        password_hash: hash_password("integration-pass").unwrap(),
        role: Role::Editor,
        is_active: true,
    };

    let created = repo.create_user(new_user.clone()).await.unwrap();
    assert_eq!(created.email, email);
    assert_eq!(created.role, Role::Editor);

    let fetched = repo.get_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.password_hash, new_user.password_hash);

    let err = repo.create_user(new_user).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Duplicate(_)));

    assert!(
        repo.get_user_by_email("missing@city.gov")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
#[serial]
async fn test_vacancy_crud() {
    let repo = setup().await;
    let position = unique("Planner");

    let created = repo
        .create_vacancy(CreateVacancyRequest {
            position: position.clone(),
            experience: "1 year".to_string(),
            salary: "negotiable".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.position, position);

    let listed = repo.list_vacancies().await.unwrap();
    assert_eq!(listed.first().map(|v| v.id), Some(created.id));

    let updated = repo
        .update_vacancy(
            created.id,
            UpdateVacancyRequest {
                salary: Some("90 000".to_string()),
                ..UpdateVacancyRequest::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.salary, "90 000");
    assert_eq!(updated.experience, "1 year");
    assert!(updated.updated_at >= created.updated_at);

    assert!(repo.delete_vacancy(created.id).await.unwrap());
    assert!(!repo.delete_vacancy(created.id).await.unwrap());
    assert!(repo.get_vacancy(created.id).await.unwrap().is_none());
    assert!(
        repo.update_vacancy(created.id, UpdateVacancyRequest::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
#[serial]
async fn test_team_member_photo_kept_then_cleared() {
    let repo = setup().await;

    let created = repo
        .create_team_member(CreateTeamMemberRequest {
            name: unique("Irina"),
            position: "Engineer".to_string(),
            experience: "4 years".to_string(),
            photo_url: Some("https://cdn.city.gov/team/irina.jpg".to_string()),
        })
        .await
        .unwrap();

    let kept = repo
        .update_team_member(
            created.id,
            UpdateTeamMemberRequest {
                position: Some("Lead engineer".to_string()),
                ..UpdateTeamMemberRequest::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.photo_url, created.photo_url);

    let cleared = repo
        .update_team_member(
            created.id,
            UpdateTeamMemberRequest {
                photo_url: Some(None),
                ..UpdateTeamMemberRequest::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.photo_url, None);
    assert_eq!(cleared.position, "Lead engineer");

    assert!(repo.delete_team_member(created.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
#[serial]
async fn test_traffic_light_default_status_and_aggregates() {
    let repo = setup().await;
    let light_type = unique("type");

    let before = repo.get_stats().await.unwrap().traffic_lights_active;

    let created = repo
        .create_traffic_light(CreateTrafficLightRequest {
            address: "Integration ave. 1".to_string(),
            light_type: light_type.clone(),
            install_year: 2003,
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(created.status, "active");

    let stats = repo.get_stats().await.unwrap();
    assert_eq!(stats.traffic_lights_active, before + 1);

    let traffic = repo.get_traffic().await.unwrap();
    assert_eq!(traffic.light_types.get(&light_type), Some(&1));
    assert!(traffic.install_years.contains_key(&2003));

    repo.update_traffic_light(
        created.id,
        UpdateTrafficLightRequest {
            status: Some("repair".to_string()),
            ..UpdateTrafficLightRequest::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        repo.get_stats().await.unwrap().traffic_lights_active,
        before
    );

    assert!(repo.delete_traffic_light(created.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
#[serial]
async fn test_latest_fine_feeds_stats() {
    let repo = setup().await;

    let far_future = Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap();
    let created = repo
        .create_fine(CreateFineRequest {
            date: far_future,
            violations_total: 4242,
            orders_total: 1,
            fines_amount_total: 2,
            collected_amount_total: 3,
        })
        .await
        .unwrap();

    let fines = repo.list_fines().await.unwrap();
    assert_eq!(fines.first().map(|f| f.id), Some(created.id));

    let stats = repo.get_stats().await.unwrap();
    assert_eq!(stats.violations_total, Some(4242));

    assert!(repo.delete_fine(created.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
#[serial]
async fn test_evacuation_route_ordering() {
    let repo = setup().await;
    let route = unique("route");

    let mut ids = Vec::new();
    for year in [1990, 1991] {
        let created = repo
            .create_evacuation_route(CreateEvacuationRouteRequest {
                year,
                month: "March".to_string(),
                route: route.clone(),
            })
            .await
            .unwrap();
        ids.push(created.id);
    }

    let years: Vec<i32> = repo
        .list_evacuation_routes()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.route == route)
        .map(|r| r.year)
        .collect();
    assert_eq!(years, vec![1991, 1990]);

    for id in ids {
        assert!(repo.delete_evacuation_route(id).await.unwrap());
    }
}
