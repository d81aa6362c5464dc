//! Fixture seeding commands.

use std::path::Path;

use hotspots_api::db::PgStore;
use hotspots_api::seed::{self, SeedOptions, SeedReport};
use tracing::info;

use super::{CommandError, connect};

/// Load fish species from `file`.
pub async fn fish(file: &Path, clear: bool) -> Result<(), CommandError> {
    // Read the fixture before connecting so a bad path fails fast
    let items = seed::load_fixture(file).await?;
    info!(path = %file.display(), records = items.len(), "Loaded fish fixture");

    let store = PgStore::new(connect().await?);
    let report = seed::seed_fish(&store, &items, options(clear)).await?;

    summarize("fish species", clear, &report);
    Ok(())
}

/// Load city locations from `file`.
pub async fn cities(file: &Path, clear: bool) -> Result<(), CommandError> {
    let items = seed::load_fixture(file).await?;
    info!(path = %file.display(), records = items.len(), "Loaded cities fixture");

    let store = PgStore::new(connect().await?);
    let report = seed::seed_cities(&store, &items, options(clear)).await?;

    summarize("locations", clear, &report);
    Ok(())
}

fn options(clear: bool) -> SeedOptions {
    SeedOptions {
        clear,
        ..SeedOptions::default()
    }
}

fn summarize(what: &str, clear: bool, report: &SeedReport) {
    info!("Seeding {what} complete!");
    if clear {
        info!("  Deleted: {}", report.cleared);
    }
    info!("  Created: {}", report.created);
    info!("  Skipped (already exist): {}", report.skipped_existing);
    info!("  Skipped (no name): {}", report.skipped_no_name);
    info!("  Truncated fields: {}", report.truncated);
    if report.invalid_position > 0 {
        info!("  Invalid positions: {}", report.invalid_position);
    }
    if report.failed > 0 {
        tracing::warn!("  Failed: {}", report.failed);
    }
}
