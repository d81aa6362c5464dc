//! City/location loader.
//!
//! Fixture records look like
//! `{"name": "...", "position": {"lat": .., "lng": ..}, "type": "fishing", "directions": "..."}`,
//! where coordinates may be numbers or numeric strings.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, instrument};

use hotspots_core::{LocationKind, Position, truncate_chars};

use super::batch::{Batcher, LocationSink};
use super::{SeedError, SeedOptions, SeedReport, admit, text_field};
use crate::db::LocationStore;
use crate::models::NewLocation;
use crate::models::location::{DIRECTIONS_MAX_LEN, NAME_MAX_LEN};

/// Load locations, skipping names that already exist.
///
/// # Errors
///
/// Returns `SeedError::Repository` if clearing or a name lookup fails.
/// Records the store rejects are counted in the report instead.
#[instrument(skip(store, items), fields(items = items.len()))]
pub async fn seed_cities<S: LocationStore + ?Sized>(
    store: &S,
    items: &[Value],
    options: SeedOptions,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    if options.clear {
        report.cleared = store.clear_locations().await?;
        info!(deleted = report.cleared, "cleared locations");
    }

    let mut batcher = Batcher::new(LocationSink(store), options.batch_size);
    let mut seen = HashSet::new();

    for item in items {
        let Some(name) = text_field(item, "name") else {
            report.skipped_no_name += 1;
            continue;
        };

        let Some(position) = item.get("position").and_then(parse_position) else {
            debug!(name, "invalid position");
            report.invalid_position += 1;
            continue;
        };

        let location = sanitize(name, position, item, &mut report);

        if seen.contains(&location.name) {
            report.skipped_existing += 1;
            continue;
        }
        let lookup = store.location_name_exists(&location.name).await;
        if !admit(&location.name, lookup, &mut report)? {
            continue;
        }

        seen.insert(location.name.clone());
        batcher.push(location, &mut report).await;
    }
    batcher.finish(&mut report).await;

    info!(%report, "city seeding complete");
    Ok(report)
}

fn sanitize(name: &str, position: Position, item: &Value, report: &mut SeedReport) -> NewLocation {
    let kind = item
        .get("type")
        .and_then(Value::as_str)
        .and_then(|t| t.trim().parse::<LocationKind>().ok())
        .unwrap_or_default();

    let mut fit = |value: &str, max: usize| {
        let t = truncate_chars(value, max);
        if t.was_truncated {
            report.truncated += 1;
        }
        t.value
    };

    NewLocation {
        name: fit(name.trim(), NAME_MAX_LEN),
        kind,
        position,
        directions: text_field(item, "directions").map(|d| fit(d, DIRECTIONS_MAX_LEN)),
        creator_id: None,
    }
}

/// Read `{lat, lng}` from numbers or numeric strings, in range.
fn parse_position(position: &Value) -> Option<Position> {
    let lat = coordinate(position.get("lat")?)?;
    let lng = coordinate(position.get("lng")?)?;
    Position::new(lat, lng).ok()
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
