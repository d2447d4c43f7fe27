//! CLI command implementations.

pub mod migrate;
pub mod purge;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use sqlx::SqlitePool;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] gilded_storefront::db::RepositoryError),

    #[error("Auth error: {0}")]
    Auth(#[from] gilded_storefront::services::AuthError),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

/// Connect to the storefront database named by the environment.
pub(crate) async fn connect() -> Result<SqlitePool, CommandError> {
    dotenvy::dotenv().ok();

    let url = std::env::var("GILDED_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("GILDED_DATABASE_URL"))?;

    let pool = gilded_storefront::db::create_pool(&SecretString::from(url)).await?;
    Ok(pool)
}
