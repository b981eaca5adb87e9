//! Bulk ingestion with bounded concurrency and per-item failure isolation
//!
//! Every record is encoded and written independently; a failing write never
//! aborts the batch and is never dropped - it lands in the report with the
//! original record and the final error, so callers can retry or audit.
//! Writes fan out through a semaphore so the store's write capacity is not
//! overwhelmed, and the call returns only after every record has been
//! attempted.

use crate::backoff::Backoff;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use reeldb_core::{MovieRecord, MovieStore, StoreError};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Total write attempts per item (initial try + transient retries).
const WRITE_ATTEMPTS: u32 = 3;

/// One record that could not be written after exhausting its retries.
#[derive(Debug)]
pub struct FailedWrite {
    pub movie: MovieRecord,
    pub error: StoreError,
}

/// Aggregate outcome of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: Vec<FailedWrite>,
}

impl IngestReport {
    /// Whether every record was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Concurrent writer for a collection of movie records.
pub struct BulkLoader<S> {
    store: Arc<S>,
    concurrency: usize,
}

impl<S: MovieStore + 'static> BulkLoader<S> {
    /// `concurrency` is clamped to `1..=128`.
    pub fn new(store: Arc<S>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.clamp(1, 128),
        }
    }

    /// Write all records, isolating per-item failures.
    ///
    /// Transient failures (throttling, timeouts) retry with exponential
    /// backoff up to [`WRITE_ATTEMPTS`] tries before being recorded as
    /// permanent. Returns after every record has been attempted.
    pub async fn ingest(&self, table: &str, records: Vec<MovieRecord>) -> IngestReport {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let table: Arc<str> = Arc::from(table);

        let mut report = IngestReport {
            attempted: records.len(),
            ..Default::default()
        };

        let mut writes = FuturesUnordered::new();
        for record in records {
            let semaphore = Arc::clone(&semaphore);
            let store = Arc::clone(&self.store);
            let table = Arc::clone(&table);

            writes.push(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return Err((record, StoreError::other("ingest semaphore closed")));
                    }
                };

                let item = record.to_stored();
                let mut backoff = Backoff::new(100, 2_000);
                let mut attempt = 0;
                loop {
                    attempt += 1;
                    match store.put_movie(&table, &item).await {
                        Ok(()) => return Ok(()),
                        Err(e) if e.is_transient() && attempt < WRITE_ATTEMPTS => {
                            debug!(
                                title = %item.title,
                                attempt,
                                error = %e,
                                "transient write failure, retrying"
                            );
                            tokio::time::sleep(backoff.next_delay()).await;
                        }
                        Err(e) => return Err((record, e)),
                    }
                }
            });
        }

        while let Some(outcome) = writes.next().await {
            match outcome {
                Ok(()) => report.succeeded += 1,
                Err((movie, error)) => report.failed.push(FailedWrite { movie, error }),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reeldb_core::{MemoryMovieStore, TableSchema};

    fn records(n: usize) -> Vec<MovieRecord> {
        (0..n)
            .map(|i| MovieRecord {
                year: 2000,
                rating: Some((i % 10) as i32),
                title: format!("movie {i}"),
            })
            .collect()
    }

    async fn active_store() -> MemoryMovieStore {
        let store = MemoryMovieStore::new();
        store
            .create_table(&TableSchema::new("movies", 1, 5))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn ingest_writes_every_record() {
        let store = active_store().await;
        let loader = BulkLoader::new(Arc::new(store.clone()), 4);

        let report = loader.ingest("movies", records(25)).await;
        assert_eq!(report.attempted, 25);
        assert_eq!(report.succeeded, 25);
        assert!(report.is_complete());
        // 25 records over 10 distinct (yr, rating) keys
        assert_eq!(store.movie_count("movies"), 10);
    }

    #[tokio::test]
    async fn failed_writes_are_isolated_and_reported() {
        let store = active_store().await;
        // every 5th record fails permanently
        for i in (0..25).step_by(5) {
            store.fail_puts_for(format!("movie {i}"));
        }
        let loader = BulkLoader::new(Arc::new(store.clone()), 4);

        let report = loader.ingest("movies", records(25)).await;
        assert_eq!(report.attempted, 25);
        assert_eq!(report.succeeded, 20);
        assert_eq!(report.failed.len(), 5);

        let mut failed_titles: Vec<String> = report
            .failed
            .iter()
            .map(|f| f.movie.title.clone())
            .collect();
        failed_titles.sort();
        assert_eq!(
            failed_titles,
            vec!["movie 0", "movie 10", "movie 15", "movie 20", "movie 5"]
        );
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let store = active_store().await;
        // two throttled responses, then writes succeed
        store.throttle_next_puts(2);
        let loader = BulkLoader::new(Arc::new(store.clone()), 1);

        let report = loader.ingest("movies", records(3)).await;
        assert_eq!(report.succeeded, 3);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn empty_dataset_is_a_complete_noop() {
        let store = active_store().await;
        let loader = BulkLoader::new(Arc::new(store), 4);

        let report = loader.ingest("movies", Vec::new()).await;
        assert_eq!(report.attempted, 0);
        assert!(report.is_complete());
    }
}
