//! CLI subcommands.

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use bella_store_storefront::db::{self, RepositoryError};
use bella_store_storefront::services::auth::AuthError;

pub mod import;
pub mod migrate;
pub mod seed;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Connect to the database named by `DATABASE_URL`.
pub(crate) async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| CliError::MissingEnvVar("DATABASE_URL"))?;

    Ok(db::create_pool(&SecretString::from(database_url)).await?)
}
