//! Command implementations.

pub mod migrate;
pub mod seed;
pub mod users;

use hotspots_api::config::{self, ConfigError};
use hotspots_api::seed::SeedError;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Seed(#[from] SeedError),
}

/// Connect using `HOTSPOTS_DATABASE_URL` (or `DATABASE_URL`).
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = config::database_url_from_env()?;

    tracing::info!("Connecting to database...");
    Ok(hotspots_api::db::create_pool(&database_url).await?)
}
