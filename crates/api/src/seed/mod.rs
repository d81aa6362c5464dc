//! Bulk loaders for fixture data.
//!
//! Each loader walks a JSON array, sanitizes records to fit the schema, skips
//! names that already exist, and writes the rest in batches. A batch the store
//! rejects is retried one record at a time so a single bad record only costs
//! itself. The outcome of a run is a [`SeedReport`].

mod batch;
mod cities;
mod fish;
mod users;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::AuthError;

pub use cities::seed_cities;
pub use fish::seed_fish;
pub use users::{TEST_USER_PASSWORD, insert_test_users};

/// Records per insert batch.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Errors that stop a seeding run.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The fixture file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fixture file is not a JSON array.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store failed outside of batch inserts (lookups, clearing).
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// A test user's password could not be hashed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

/// How a seeding run behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    /// Delete every existing row of the target table first.
    pub clear: bool,
    /// Records per insert batch.
    pub batch_size: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            clear: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Counts from one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Rows deleted by `clear`.
    pub cleared: u64,
    pub created: usize,
    /// Name already in the store or earlier in the same file.
    pub skipped_existing: usize,
    pub skipped_no_name: usize,
    /// Fields cut down to their column width.
    pub truncated: usize,
    pub invalid_position: usize,
    /// Records the store rejected even on their own.
    pub failed: usize,
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created: {}, skipped (existing): {}, skipped (no name): {}, truncated fields: {}, invalid positions: {}, failed: {}",
            self.created,
            self.skipped_existing,
            self.skipped_no_name,
            self.truncated,
            self.invalid_position,
            self.failed
        )
    }
}

/// Whether a record may be queued, given the store's lookup of its name.
///
/// An existing name counts as skipped. A name the store refuses to look up
/// (a NUL byte, say) counts as failed.
fn admit(
    name: &str,
    lookup: Result<bool, RepositoryError>,
    report: &mut SeedReport,
) -> Result<bool, SeedError> {
    match lookup {
        Ok(false) => Ok(true),
        Ok(true) => {
            report.skipped_existing += 1;
            Ok(false)
        }
        Err(RepositoryError::Constraint(reason)) => {
            tracing::warn!(name, %reason, "store rejected record");
            report.failed += 1;
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Read a fixture file holding a JSON array.
///
/// # Errors
///
/// Returns `SeedError::Io` if the file cannot be read (including when it does
/// not exist) and `SeedError::Parse` if it is not a JSON array.
pub async fn load_fixture(path: impl AsRef<Path>) -> Result<Vec<Value>, SeedError> {
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// A non-blank string field of a fixture record.
fn text_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_field() {
        let item = json!({"name": "Pike", "blank": "  ", "number": 5});
        assert_eq!(text_field(&item, "name"), Some("Pike"));
        assert_eq!(text_field(&item, "blank"), None);
        assert_eq!(text_field(&item, "number"), None);
        assert_eq!(text_field(&item, "missing"), None);
    }

    #[tokio::test]
    async fn test_missing_fixture_is_io_error() {
        let err = load_fixture("does/not/exist.json").await.unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }

    #[test]
    fn test_report_display() {
        let report = SeedReport {
            created: 3,
            failed: 1,
            ..SeedReport::default()
        };
        let text = report.to_string();
        assert!(text.starts_with("created: 3"));
        assert!(text.ends_with("failed: 1"));
    }
}
