use crate::{
    AppState,
    handlers::{
        evacuation_routes, evacuations, fines, news, projects, services, stats, team,
        traffic_lights, vacancies,
    },
};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Read-only endpoints for the resident-facing site. No authentication; every route is a
/// list or a lookup by id, plus the dashboard aggregates and the liveness probe.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Never touches the database.
        .route("/health", get(stats::health))
        // GET /stats, /traffic
        // Dashboard aggregates computed from the latest reports.
        .route("/stats", get(stats::get_stats))
        .route("/traffic", get(stats::get_traffic))
        .route("/fines", get(fines::list_fines))
        .route("/fines/{id}", get(fines::get_fine))
        .route("/evacuations", get(evacuations::list_evacuations))
        .route("/evacuations/{id}", get(evacuations::get_evacuation))
        .route(
            "/evacuation-routes",
            get(evacuation_routes::list_evacuation_routes),
        )
        .route(
            "/evacuation-routes/{id}",
            get(evacuation_routes::get_evacuation_route),
        )
        .route("/traffic-lights", get(traffic_lights::list_traffic_lights))
        .route("/traffic-lights/{id}", get(traffic_lights::get_traffic_light))
        .route("/news", get(news::list_news))
        .route("/news/{id}", get(news::get_news))
        .route("/services", get(services::list_services))
        .route("/services/{id}", get(services::get_service))
        .route("/team", get(team::list_team_members))
        .route("/team/{id}", get(team::get_team_member))
        .route("/projects", get(projects::list_projects))
        .route("/projects/{id}", get(projects::get_project))
        .route("/vacancies", get(vacancies::list_vacancies))
        .route("/vacancies/{id}", get(vacancies::get_vacancy))
}
