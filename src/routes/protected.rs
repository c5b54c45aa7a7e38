use crate::{
    AppState,
    auth::{
        Role,
        middleware::{authenticate, require_role},
    },
    handlers::{
        evacuation_routes, evacuations, fines, news, projects, services, team, traffic_lights,
        vacancies,
    },
};
use axum::{Router, middleware, routing::get};

/// Protected Router Module
///
/// The full CRUD surface for every resource. The same router is mounted twice, under
/// `/api/editor` with `Role::Editor` and under `/api/admin` with `Role::Admin`; the only
/// difference between the two is the role gate.
///
/// Layer order matters: `route_layer` wraps outside-in, so the layer added last
/// (`authenticate`) runs first and `require_role` always sees an identity when the token
/// was valid.
pub fn protected_routes(state: &AppState, required: Role) -> Router<AppState> {
    Router::new()
        .route("/fines", get(fines::list_fines).post(fines::create_fine))
        .route(
            "/fines/{id}",
            get(fines::get_fine)
                .put(fines::update_fine)
                .delete(fines::delete_fine),
        )
        .route(
            "/evacuations",
            get(evacuations::list_evacuations).post(evacuations::create_evacuation),
        )
        .route(
            "/evacuations/{id}",
            get(evacuations::get_evacuation)
                .put(evacuations::update_evacuation)
                .delete(evacuations::delete_evacuation),
        )
        .route(
            "/evacuation-routes",
            get(evacuation_routes::list_evacuation_routes)
                .post(evacuation_routes::create_evacuation_route),
        )
        .route(
            "/evacuation-routes/{id}",
            get(evacuation_routes::get_evacuation_route)
                .put(evacuation_routes::update_evacuation_route)
                .delete(evacuation_routes::delete_evacuation_route),
        )
        .route(
            "/traffic-lights",
            get(traffic_lights::list_traffic_lights).post(traffic_lights::create_traffic_light),
        )
        .route(
            "/traffic-lights/{id}",
            get(traffic_lights::get_traffic_light)
                .put(traffic_lights::update_traffic_light)
                .delete(traffic_lights::delete_traffic_light),
        )
        .route("/news", get(news::list_news).post(news::create_news))
        .route(
            "/news/{id}",
            get(news::get_news)
                .put(news::update_news)
                .delete(news::delete_news),
        )
        .route(
            "/services",
            get(services::list_services).post(services::create_service),
        )
        .route(
            "/services/{id}",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .route(
            "/team",
            get(team::list_team_members).post(team::create_team_member),
        )
        .route(
            "/team/{id}",
            get(team::get_team_member)
                .put(team::update_team_member)
                .delete(team::delete_team_member),
        )
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/vacancies",
            get(vacancies::list_vacancies).post(vacancies::create_vacancy),
        )
        .route(
            "/vacancies/{id}",
            get(vacancies::get_vacancy)
                .put(vacancies::update_vacancy)
                .delete(vacancies::delete_vacancy),
        )
        .route_layer(middleware::from_fn_with_state(required, require_role))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            authenticate,
        ))
}
