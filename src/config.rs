use std::{env, fmt, str::FromStr, time::Duration};
use thiserror::Error;

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_PASSWORD: &str = "password";
pub const DEFAULT_DB_NAME: &str = "smolathon_db";
pub const DEFAULT_JWT_SECRET: &str = "your-default-secret-key-change-in-production";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// ConfigError
///
/// A variable was set but its value could not be used. Missing variables are never an
/// error; they fall back to their defaults.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// AppConfig
///
/// Holds the application's entire configuration. Loaded once at startup and immutable
/// afterwards; handlers reach it through `FromRef<AppState>`.
#[derive(Clone)]
pub struct AppConfig {
    /// Runtime environment marker. Selects the log format.
    pub env: Env,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// Symmetric key used to sign and verify identity tokens.
    pub jwt_secret: String,
    /// HTTP listen port.
    pub port: u16,
    /// Origins allowed to make credentialed cross-origin requests. Empty means any origin,
    /// without credentials.
    pub cors_allowed_origins: Vec<String>,
    /// How long in-flight requests get to finish after a shutdown signal.
    pub shutdown_grace: Duration,
    /// Upper bound on handling one request, body read included. Slower requests get 408.
    pub request_timeout: Duration,
}

/// Env
///
/// Defines the runtime context: human-readable logs locally, JSON logs in production.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Every variable at its default. Used by tests to build state without touching the
    /// process environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_host: DEFAULT_DB_HOST.to_string(),
            db_port: DEFAULT_DB_PORT,
            db_user: DEFAULT_DB_USER.to_string(),
            db_password: DEFAULT_DB_PASSWORD.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: Vec::new(),
            shutdown_grace: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the process environment. Call after `dotenv` so that a
    /// local `.env` file is honoured.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty or whitespace-only
    /// values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let text = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let env = match get("APP_ENV").as_deref() {
            Some("production") => Env::Production,
            _ => Env::Local,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let grace_secs: u64 = parse_or(
            "SHUTDOWN_GRACE_SECS",
            get("SHUTDOWN_GRACE_SECS"),
            DEFAULT_SHUTDOWN_GRACE_SECS,
            "a whole number of seconds",
        )?;
        let timeout_secs: u64 = parse_or(
            "REQUEST_TIMEOUT_SECS",
            get("REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
            "a whole number of seconds",
        )?;

        Ok(Self {
            env,
            db_host: text("DB_HOST", DEFAULT_DB_HOST),
            db_port: parse_or("DB_PORT", get("DB_PORT"), DEFAULT_DB_PORT, "a port number")?,
            db_user: text("DB_USER", DEFAULT_DB_USER),
            db_password: text("DB_PASSWORD", DEFAULT_DB_PASSWORD),
            db_name: text("DB_NAME", DEFAULT_DB_NAME),
            jwt_secret: text("JWT_SECRET", DEFAULT_JWT_SECRET),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT, "a port number")?,
            cors_allowed_origins,
            shutdown_grace: Duration::from_secs(grace_secs),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// True when tokens are being signed with the well-known fallback secret.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// Connection target for logs, password masked.
    pub fn database_target(&self) -> String {
        format!(
            "postgres://{}:****@{}:{}/{}",
            self.db_user, self.db_host, self.db_port, self.db_name
        )
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("database", &self.database_target())
            .field("jwt_secret", &"****")
            .field("port", &self.port)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("shutdown_grace", &self.shutdown_grace)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn parse_or<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            value,
            expected,
        }),
    }
}
