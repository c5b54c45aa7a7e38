use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{
    CreateEvacuationRequest, CreateEvacuationRouteRequest, CreateFineRequest, CreateNewsRequest,
    CreateProjectRequest, CreateServiceRequest, CreateTeamMemberRequest,
    CreateTrafficLightRequest, CreateVacancyRequest, DashboardStats, Evacuation, EvacuationRoute,
    Fine, News, NewUser, Project, Service, TeamMember, TrafficLight, TrafficSummary,
    UpdateEvacuationRequest, UpdateEvacuationRouteRequest, UpdateFineRequest, UpdateNewsRequest,
    UpdateProjectRequest, UpdateServiceRequest, UpdateTeamMemberRequest,
    UpdateTrafficLightRequest, UpdateVacancyRequest, User, Vacancy,
};

mod memory;
mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// RepositoryError
///
/// Failures of the persistence layer. Handlers never show these to clients; they are
/// logged and replaced by a generic 500 message.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A unique constraint rejected the write (e.g. a second user with the same email).
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// The backing store refused to serve the call. Raised by the in-memory store when it
    /// is built with [`InMemoryRepository::failing`].
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Self::Duplicate(db.message().to_string());
            }
        }
        Self::Database(err)
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository Trait
///
/// The persistence contract behind every handler. Each method is a single statement
/// against the store; there is no multi-step transaction anywhere in the API.
///
/// Conventions shared by every entity:
/// - `get_*` and `update_*` return `Ok(None)` when no row has the id.
/// - `update_*` only touches the fields that are `Some` and always refreshes `updated_at`.
/// - `delete_*` returns `Ok(false)` when nothing was deleted.
///
/// **Send + Sync + async_trait** make `Arc<dyn Repository>` shareable across axum's tasks.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    async fn create_user(&self, user: NewUser) -> RepoResult<User>;

    // --- Fines (newest report first) ---
    async fn list_fines(&self) -> RepoResult<Vec<Fine>>;
    async fn get_fine(&self, id: i32) -> RepoResult<Option<Fine>>;
    async fn create_fine(&self, req: CreateFineRequest) -> RepoResult<Fine>;
    async fn update_fine(&self, id: i32, req: UpdateFineRequest) -> RepoResult<Option<Fine>>;
    async fn delete_fine(&self, id: i32) -> RepoResult<bool>;

    // --- Evacuations (newest report first) ---
    async fn list_evacuations(&self) -> RepoResult<Vec<Evacuation>>;
    async fn get_evacuation(&self, id: i32) -> RepoResult<Option<Evacuation>>;
    async fn create_evacuation(&self, req: CreateEvacuationRequest) -> RepoResult<Evacuation>;
    async fn update_evacuation(
        &self,
        id: i32,
        req: UpdateEvacuationRequest,
    ) -> RepoResult<Option<Evacuation>>;
    async fn delete_evacuation(&self, id: i32) -> RepoResult<bool>;

    // --- Evacuation routes (latest year first, then month) ---
    async fn list_evacuation_routes(&self) -> RepoResult<Vec<EvacuationRoute>>;
    async fn get_evacuation_route(&self, id: i32) -> RepoResult<Option<EvacuationRoute>>;
    async fn create_evacuation_route(
        &self,
        req: CreateEvacuationRouteRequest,
    ) -> RepoResult<EvacuationRoute>;
    async fn update_evacuation_route(
        &self,
        id: i32,
        req: UpdateEvacuationRouteRequest,
    ) -> RepoResult<Option<EvacuationRoute>>;
    async fn delete_evacuation_route(&self, id: i32) -> RepoResult<bool>;

    // --- Traffic lights (most recently installed first) ---
    async fn list_traffic_lights(&self) -> RepoResult<Vec<TrafficLight>>;
    async fn get_traffic_light(&self, id: i32) -> RepoResult<Option<TrafficLight>>;
    async fn create_traffic_light(&self, req: CreateTrafficLightRequest)
    -> RepoResult<TrafficLight>;
    async fn update_traffic_light(
        &self,
        id: i32,
        req: UpdateTrafficLightRequest,
    ) -> RepoResult<Option<TrafficLight>>;
    async fn delete_traffic_light(&self, id: i32) -> RepoResult<bool>;

    // --- News (newest first) ---
    async fn list_news(&self) -> RepoResult<Vec<News>>;
    async fn get_news(&self, id: i32) -> RepoResult<Option<News>>;
    async fn create_news(&self, req: CreateNewsRequest) -> RepoResult<News>;
    async fn update_news(&self, id: i32, req: UpdateNewsRequest) -> RepoResult<Option<News>>;
    async fn delete_news(&self, id: i32) -> RepoResult<bool>;

    // --- Services ---
    async fn list_services(&self) -> RepoResult<Vec<Service>>;
    async fn get_service(&self, id: i32) -> RepoResult<Option<Service>>;
    async fn create_service(&self, req: CreateServiceRequest) -> RepoResult<Service>;
    async fn update_service(
        &self,
        id: i32,
        req: UpdateServiceRequest,
    ) -> RepoResult<Option<Service>>;
    async fn delete_service(&self, id: i32) -> RepoResult<bool>;

    // --- Team ---
    async fn list_team_members(&self) -> RepoResult<Vec<TeamMember>>;
    async fn get_team_member(&self, id: i32) -> RepoResult<Option<TeamMember>>;
    async fn create_team_member(&self, req: CreateTeamMemberRequest) -> RepoResult<TeamMember>;
    async fn update_team_member(
        &self,
        id: i32,
        req: UpdateTeamMemberRequest,
    ) -> RepoResult<Option<TeamMember>>;
    async fn delete_team_member(&self, id: i32) -> RepoResult<bool>;

    // --- Projects ---
    async fn list_projects(&self) -> RepoResult<Vec<Project>>;
    async fn get_project(&self, id: i32) -> RepoResult<Option<Project>>;
    async fn create_project(&self, req: CreateProjectRequest) -> RepoResult<Project>;
    async fn update_project(
        &self,
        id: i32,
        req: UpdateProjectRequest,
    ) -> RepoResult<Option<Project>>;
    async fn delete_project(&self, id: i32) -> RepoResult<bool>;

    // --- Vacancies (newest first) ---
    async fn list_vacancies(&self) -> RepoResult<Vec<Vacancy>>;
    async fn get_vacancy(&self, id: i32) -> RepoResult<Option<Vacancy>>;
    async fn create_vacancy(&self, req: CreateVacancyRequest) -> RepoResult<Vacancy>;
    async fn update_vacancy(
        &self,
        id: i32,
        req: UpdateVacancyRequest,
    ) -> RepoResult<Option<Vacancy>>;
    async fn delete_vacancy(&self, id: i32) -> RepoResult<bool>;

    // --- Aggregates ---
    async fn get_stats(&self) -> RepoResult<DashboardStats>;
    async fn get_traffic(&self) -> RepoResult<TrafficSummary>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;
