//! Batched inserts with per-record fallback.

use tracing::{debug, warn};

use super::SeedReport;
use crate::db::{FishStore, LocationStore, RepositoryError};
use crate::models::{NewFish, NewLocation};

/// Somewhere a batch of records can be written atomically.
pub(crate) trait BatchSink {
    type Item;

    async fn insert_many(&self, batch: &[Self::Item]) -> Result<u64, RepositoryError>;

    /// Name of a record, for logs.
    fn describe(item: &Self::Item) -> &str;
}

pub(crate) struct FishSink<'a, S: ?Sized>(pub &'a S);

impl<S: FishStore + ?Sized> BatchSink for FishSink<'_, S> {
    type Item = NewFish;

    async fn insert_many(&self, batch: &[NewFish]) -> Result<u64, RepositoryError> {
        self.0.insert_fish(batch).await
    }

    fn describe(item: &NewFish) -> &str {
        &item.name
    }
}

pub(crate) struct LocationSink<'a, S: ?Sized>(pub &'a S);

impl<S: LocationStore + ?Sized> BatchSink for LocationSink<'_, S> {
    type Item = NewLocation;

    async fn insert_many(&self, batch: &[NewLocation]) -> Result<u64, RepositoryError> {
        self.0.insert_locations(batch).await
    }

    fn describe(item: &NewLocation) -> &str {
        &item.name
    }
}

/// Buffers records and writes them `batch_size` at a time.
pub(crate) struct Batcher<K: BatchSink> {
    sink: K,
    pending: Vec<K::Item>,
    batch_size: usize,
}

impl<K: BatchSink> Batcher<K> {
    pub(crate) fn new(sink: K, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            sink,
            pending: Vec::with_capacity(batch_size),
            batch_size,
        }
    }

    /// Queue a record, writing the batch once it is full.
    pub(crate) async fn push(&mut self, item: K::Item, report: &mut SeedReport) {
        self.pending.push(item);
        if self.pending.len() >= self.batch_size {
            self.flush(report).await;
        }
    }

    /// Write whatever is still queued.
    pub(crate) async fn finish(mut self, report: &mut SeedReport) {
        self.flush(report).await;
    }

    async fn flush(&mut self, report: &mut SeedReport) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);

        match self.sink.insert_many(&batch).await {
            Ok(_) => {
                debug!(records = batch.len(), "batch committed");
                report.created += batch.len();
            }
            Err(e) => {
                warn!(
                    error = %e,
                    records = batch.len(),
                    "batch commit failed, retrying records one at a time"
                );
                for item in &batch {
                    match self.sink.insert_many(std::slice::from_ref(item)).await {
                        Ok(_) => report.created += 1,
                        Err(e) => {
                            warn!(record = K::describe(item), error = %e, "skipping record");
                            report.failed += 1;
                        }
                    }
                }
            }
        }
    }
}
