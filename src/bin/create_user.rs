//! Provisions a staff account with an Argon2-hashed password.
//!
//! ```text
//! NEW_USER_PASSWORD=... create-user --email admin@city.gov --role admin
//! ```

use clap::Parser;
use municipal_portal::{
    Role,
    auth::password::hash_password,
    config::AppConfig,
    extract::looks_like_email,
    models::NewUser,
    repository::{PostgresRepository, Repository, RepositoryError},
};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "create-user", about = "Create an admin or editor account")]
struct Args {
    /// Login email of the new account.
    #[arg(long)]
    email: String,

    /// `admin` or `editor`.
    #[arg(long, default_value = "editor")]
    role: Role,

    /// Plain-text password; hashed before it reaches the database.
    #[arg(long, env = "NEW_USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Create the account disabled.
    #[arg(long)]
    inactive: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "create_user=info,municipal_portal=info".into()),
        )
        .init();

    let args = Args::parse();

    let email = args.email.trim().to_string();
    if !looks_like_email(&email) {
        eprintln!("not a valid email: {email:?}");
        return ExitCode::FAILURE;
    }
    if args.password.is_empty() {
        eprintln!("password must not be empty");
        return ExitCode::FAILURE;
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let password_hash = match hash_password(&args.password) {
        Ok(hash) => hash,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let repo = match PostgresRepository::connect(&config).await {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("cannot reach {}: {err}", config.database_target());
            return ExitCode::FAILURE;
        }
    };

    let new_user = NewUser {
        email,
        password_hash,
        role: args.role,
        is_active: !args.inactive,
    };

    match repo.create_user(new_user).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, email = %user.email, role = %user.role, "user created");
            println!("created {} #{} ({})", user.role, user.id, user.email);
            ExitCode::SUCCESS
        }
        Err(RepositoryError::Duplicate(_)) => {
            eprintln!("an account with that email already exists");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("failed to create user: {err}");
            ExitCode::FAILURE
        }
    }
}
