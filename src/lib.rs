use axum::{
    Router,
    extract::FromRef,
    http::{
        HeaderName, HeaderValue, Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
    },
};
use std::{sync::Arc, time::Duration};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod server;

// Routing is segregated by access tier (public, login, protected).
pub mod routes;
use routes::{auth::auth_routes, protected::protected_routes, public::public_routes};

// --- Public Re-exports ---

pub use auth::{Role, TokenService, TokenState};
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use repository::{InMemoryRepository, PostgresRepository, Repository, RepositoryState};

const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the OpenAPI
/// document served at `/api-docs/openapi.json`. Mutating operations are listed under
/// their `/api/admin` path; the `/api/editor` surface is identical.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::admin_login, handlers::auth::editor_login, handlers::auth::login,
        handlers::stats::health, handlers::stats::get_stats, handlers::stats::get_traffic,
        handlers::fines::list_fines, handlers::fines::get_fine, handlers::fines::create_fine,
        handlers::fines::update_fine, handlers::fines::delete_fine,
        handlers::evacuations::list_evacuations, handlers::evacuations::get_evacuation,
        handlers::evacuations::create_evacuation, handlers::evacuations::update_evacuation,
        handlers::evacuations::delete_evacuation,
        handlers::evacuation_routes::list_evacuation_routes,
        handlers::evacuation_routes::get_evacuation_route,
        handlers::evacuation_routes::create_evacuation_route,
        handlers::evacuation_routes::update_evacuation_route,
        handlers::evacuation_routes::delete_evacuation_route,
        handlers::traffic_lights::list_traffic_lights, handlers::traffic_lights::get_traffic_light,
        handlers::traffic_lights::create_traffic_light,
        handlers::traffic_lights::update_traffic_light,
        handlers::traffic_lights::delete_traffic_light,
        handlers::news::list_news, handlers::news::get_news, handlers::news::create_news,
        handlers::news::update_news, handlers::news::delete_news,
        handlers::services::list_services, handlers::services::get_service,
        handlers::services::create_service, handlers::services::update_service,
        handlers::services::delete_service,
        handlers::team::list_team_members, handlers::team::get_team_member,
        handlers::team::create_team_member, handlers::team::update_team_member,
        handlers::team::delete_team_member,
        handlers::projects::list_projects, handlers::projects::get_project,
        handlers::projects::create_project, handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::vacancies::list_vacancies, handlers::vacancies::get_vacancy,
        handlers::vacancies::create_vacancy, handlers::vacancies::update_vacancy,
        handlers::vacancies::delete_vacancy,
    ),
    components(
        schemas(
            auth::Role, models::UserProfile, models::LoginRequest, models::LoginResponse,
            models::Fine, models::CreateFineRequest, models::UpdateFineRequest,
            models::Evacuation, models::CreateEvacuationRequest, models::UpdateEvacuationRequest,
            models::EvacuationRoute, models::CreateEvacuationRouteRequest,
            models::UpdateEvacuationRouteRequest,
            models::TrafficLight, models::CreateTrafficLightRequest,
            models::UpdateTrafficLightRequest,
            models::News, models::CreateNewsRequest, models::UpdateNewsRequest,
            models::Service, models::CreateServiceRequest, models::UpdateServiceRequest,
            models::TeamMember, models::CreateTeamMemberRequest, models::UpdateTeamMemberRequest,
            models::Project, models::CreateProjectRequest, models::UpdateProjectRequest,
            models::Vacancy, models::CreateVacancyRequest, models::UpdateVacancyRequest,
            models::DashboardStats, models::TrafficSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "municipal-portal", description = "Municipal services administration API")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// AppState
///
/// The single, cloneable container of everything a request may need. Nothing is global:
/// handlers and middleware pull the piece they use through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Issues and validates identity tokens.
    pub tokens: TokenState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Builds the state, deriving the token service from the configured secret.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret));
        Self {
            repo,
            tokens,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for TokenState {
    fn from_ref(app_state: &AppState) -> TokenState {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the full routing tree, attaches the access-control layers to the protected
/// tiers and wraps everything in the observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let request_timeout = state.config.request_timeout;

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let api = Router::new()
        .merge(public_routes())
        .nest("/auth", auth_routes())
        .nest("/editor", protected_routes(&state, Role::Editor))
        .nest("/admin", protected_routes(&state, Role::Admin));

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id))
                // Answers 408 once a request outlives the configured timeout.
                .layer(TimeoutLayer::new(request_timeout)),
        )
        // Outermost, so preflight requests are answered before routing and auth.
        .layer(cors)
}

/// cors_layer
///
/// With `CORS_ALLOWED_ORIGINS` set, only those origins are echoed back and credentials are
/// allowed. Without it any origin is accepted, and credentials are not (browsers reject
/// `*` combined with credentials).
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            ORIGIN,
            CONTENT_TYPE,
            ACCEPT,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(CORS_MAX_AGE);

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

/// trace_span_logger
///
/// Builds the per-request span for `TraceLayer`, carrying method, URI and the
/// `x-request-id` so every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
