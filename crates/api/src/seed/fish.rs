//! Fish species loader.
//!
//! Fixture records look like
//! `{"name": "...", "url": "...", "img_src_set": {"2x": "...", "1.5x": "..."}}`.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{info, instrument};

use hotspots_core::truncate_chars;

use super::batch::{Batcher, FishSink};
use super::{SeedError, SeedOptions, SeedReport, admit, text_field};
use crate::db::FishStore;
use crate::models::NewFish;
use crate::models::fish::{LINK_MAX_LEN, NAME_MAX_LEN};

/// Load fish species, skipping names that already exist.
///
/// # Errors
///
/// Returns `SeedError::Repository` if clearing or a name lookup fails.
/// Records the store rejects are counted in the report instead.
#[instrument(skip(store, items), fields(items = items.len()))]
pub async fn seed_fish<S: FishStore + ?Sized>(
    store: &S,
    items: &[Value],
    options: SeedOptions,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    if options.clear {
        report.cleared = store.clear_fish().await?;
        info!(deleted = report.cleared, "cleared fish");
    }

    let mut batcher = Batcher::new(FishSink(store), options.batch_size);
    let mut seen = HashSet::new();

    for item in items {
        let Some(fish) = sanitize(item, &mut report) else {
            report.skipped_no_name += 1;
            continue;
        };

        if seen.contains(&fish.name) {
            report.skipped_existing += 1;
            continue;
        }
        let lookup = store.fish_name_exists(&fish.name).await;
        if !admit(&fish.name, lookup, &mut report)? {
            continue;
        }

        seen.insert(fish.name.clone());
        batcher.push(fish, &mut report).await;
    }
    batcher.finish(&mut report).await;

    info!(%report, "fish seeding complete");
    Ok(report)
}

/// Build the insert form of a record, or `None` if it has no name.
fn sanitize(item: &Value, report: &mut SeedReport) -> Option<NewFish> {
    let name = text_field(item, "name")?;
    let wiki_link = text_field(item, "url");
    let image_link = item.get("img_src_set").and_then(pick_image);

    let mut fit = |value: &str, max: usize| {
        let t = truncate_chars(value, max);
        if t.was_truncated {
            report.truncated += 1;
        }
        t.value
    };

    Some(NewFish {
        name: fit(name, NAME_MAX_LEN),
        wiki_link: wiki_link.map(|link| fit(link, LINK_MAX_LEN)),
        image_link: image_link.map(|link| fit(link, LINK_MAX_LEN)),
    })
}

/// Prefer the 2x image, then 1.5x, then whatever comes first.
fn pick_image(src_set: &Value) -> Option<&str> {
    fn usable(v: &Value) -> Option<&str> {
        v.as_str().filter(|s| !s.trim().is_empty())
    }

    let src_set = src_set.as_object()?;

    src_set
        .get("2x")
        .and_then(usable)
        .or_else(|| src_set.get("1.5x").and_then(usable))
        .or_else(|| src_set.values().find_map(usable))
}
