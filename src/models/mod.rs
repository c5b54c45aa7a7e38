//! Database records, request payloads and response bodies.
//!
//! Every record type maps one-to-one onto a table in `public` and is shared by the
//! Postgres and in-memory repositories.

use serde::{Deserialize, Deserializer};

mod evacuation;
mod fine;
mod news;
mod project;
mod service;
mod stats;
mod team;
mod traffic_light;
mod user;
mod vacancy;

pub use evacuation::{
    CreateEvacuationRequest, CreateEvacuationRouteRequest, Evacuation, EvacuationRoute,
    UpdateEvacuationRequest, UpdateEvacuationRouteRequest,
};
pub use fine::{CreateFineRequest, Fine, UpdateFineRequest};
pub use news::{CreateNewsRequest, News, UpdateNewsRequest};
pub use project::{CreateProjectRequest, DEFAULT_PROJECT_STATUS, Project, UpdateProjectRequest};
pub use service::{CreateServiceRequest, Service, UpdateServiceRequest};
pub use stats::{DashboardStats, TrafficSummary};
pub use team::{CreateTeamMemberRequest, TeamMember, UpdateTeamMemberRequest};
pub use traffic_light::{
    CreateTrafficLightRequest, DEFAULT_TRAFFIC_LIGHT_STATUS, TrafficLight,
    UpdateTrafficLightRequest,
};
pub use user::{LoginRequest, LoginResponse, NewUser, User, UserProfile};
pub use vacancy::{CreateVacancyRequest, UpdateVacancyRequest, Vacancy};

/// Deserializer for a nullable column in a partial update. An absent key stays `None`
/// (via `#[serde(default)]`), an explicit `null` becomes `Some(None)` and clears the column.
pub(crate) fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
