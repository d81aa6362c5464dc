//! Persistence for the hotspots API.
//!
//! # Database
//!
//! All durable state lives in PostgreSQL:
//!
//! ## Tables
//!
//! - `users` - Accounts (email, Argon2 password hash, display name, zipcode)
//! - `locations` - Fishing/hunting spots, optionally owned by a user
//! - `likes` - User ↔ location many-to-many join
//! - `fish` - Fish species directory
//!
//! # Store handles
//!
//! Handlers and seeders never reach for a global connection. They are handed
//! an explicit [`Store`]: [`PgStore`] in production, [`MemoryStore`] in tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p hotspots-cli -- migrate
//! ```

mod fish;
mod locations;
mod memory;
mod postgres;
mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use fish::FishStore;
pub use locations::LocationStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use users::{UserCredentials, UserStore};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store rejected a value (column width, check constraint, NUL byte).
    #[error("constraint violation: {0}")]
    Constraint(String),
}

/// SQLSTATEs for values a column refuses: `string_data_right_truncation`
/// and `character_not_in_repertoire` (NUL in text).
const REJECTED_VALUE_CODES: [&str; 2] = ["22001", "22021"];

impl RepositoryError {
    /// Classify a sqlx error.
    ///
    /// Unique violations become `Conflict`. Check and foreign key violations
    /// and values a column refuses become `Constraint`.
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict.to_owned());
            }
            let rejected_value = db_err
                .code()
                .is_some_and(|code| REJECTED_VALUE_CODES.contains(&code.as_ref()));
            if db_err.is_check_violation()
                || db_err.is_foreign_key_violation()
                || rejected_value
            {
                return Self::Constraint(db_err.message().to_owned());
            }
        }
        Self::Database(e)
    }
}

/// Everything the API and seeders need from persistence.
#[async_trait]
pub trait Store: UserStore + LocationStore + FishStore {
    /// Check the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store cannot be reached.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
