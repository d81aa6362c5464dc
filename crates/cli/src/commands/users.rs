//! Test user command.

use hotspots_api::db::PgStore;
use hotspots_api::seed::{self, TEST_USER_PASSWORD};

use super::{CommandError, connect};

/// Create `count` numbered test users.
pub async fn insert_test_users(count: u32) -> Result<(), CommandError> {
    let store = PgStore::new(connect().await?);
    let report = seed::insert_test_users(&store, count).await?;

    tracing::info!(
        created = report.created,
        skipped = report.skipped_existing,
        password = TEST_USER_PASSWORD,
        "Test users ready"
    );
    Ok(())
}
