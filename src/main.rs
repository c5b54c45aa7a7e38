use municipal_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{PostgresRepository, RepositoryState},
    server,
};
use std::{process::ExitCode, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initialises logging, connects to Postgres and serves the API until
/// a shutdown signal. Any startup failure is reported and turned into a non-zero exit.
#[tokio::main]
async fn main() -> ExitCode {
    // 1. Configuration (.env first, so it can feed the environment).
    dotenv::dotenv().ok();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // 2. Logging. RUST_LOG wins over the built-in default filter.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "municipal_portal=debug,tower_http=info,axum=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!(config = ?config, "application starting in {:?} mode", config.env);
    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET is not set; tokens are signed with the built-in default secret");
    }

    // 3. Database.
    let repo = match PostgresRepository::connect(&config).await {
        Ok(repo) => Arc::new(repo) as RepositoryState,
        Err(err) => {
            tracing::error!(
                database = %config.database_target(),
                error = %err,
                "failed to connect to Postgres"
            );
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(database = %config.database_target(), "connected to Postgres");

    // 4. Router and server.
    let addr = format!("0.0.0.0:{}", config.port);
    let grace = config.shutdown_grace;
    let app = create_router(AppState::new(repo, config));

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(addr = %addr, error = %err, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Listening on {addr}");
    tracing::info!("API Documentation (Swagger UI) available at: http://{addr}/swagger-ui");

    if let Err(err) = server::serve(listener, app, grace).await {
        tracing::error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
