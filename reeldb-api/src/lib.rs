//! Orchestration layer for ReelDB
//!
//! Ties the trait seams together into the three operations the HTTP facade
//! exposes: initialize (fetch -> create -> await active -> bulk ingest),
//! query (validate -> execute -> decode), and destroy.
//!
//! All backends and tuning knobs are injected at construction; there is no
//! global client or configuration state, so any [`MovieStore`] /
//! [`DatasetSource`] implementation (including the in-memory test doubles)
//! can be substituted.

pub mod backoff;
pub mod error;
pub mod ingest;
pub mod lifecycle;
pub mod query;

pub use backoff::Backoff;
pub use error::ApiError;
pub use ingest::{BulkLoader, FailedWrite, IngestReport};
pub use lifecycle::TableLifecycle;

use reeldb_core::{DatasetSource, MovieQuery, MovieRow, MovieStore, TableSchema};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Tuning knobs for initialization.
#[derive(Debug, Clone)]
pub struct ReelDbOptions {
    /// Sleep between table status polls
    pub poll_interval: Duration,
    /// Status polls before giving up on provisioning
    pub max_poll_attempts: u32,
    /// Concurrent writes during bulk ingestion
    pub ingest_concurrency: usize,
}

impl Default for ReelDbOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_poll_attempts: 60,
            ingest_concurrency: 16,
        }
    }
}

/// The movie table service: one dataset source, one store, one table.
#[derive(Debug)]
pub struct ReelDb<S, D> {
    store: Arc<S>,
    source: Arc<D>,
    schema: TableSchema,
    options: ReelDbOptions,
}

impl<S: MovieStore + 'static, D: DatasetSource> ReelDb<S, D> {
    pub fn new(store: S, source: D, schema: TableSchema) -> Self {
        Self {
            store: Arc::new(store),
            source: Arc::new(source),
            schema,
            options: ReelDbOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReelDbOptions) -> Self {
        self.options = options;
        self
    }

    /// The name of the managed table.
    pub fn table_name(&self) -> &str {
        &self.schema.table_name
    }

    fn lifecycle(&self) -> TableLifecycle<S> {
        TableLifecycle::new(
            Arc::clone(&self.store),
            self.options.poll_interval,
            self.options.max_poll_attempts,
        )
    }

    /// Fetch the dataset, provision the table, wait for it to become active,
    /// and bulk-load the records.
    ///
    /// Per-item write failures do not fail the operation; they are returned
    /// in the [`IngestReport`]. Dropping the returned future cancels the
    /// poll loop and any in-flight writes - the table's remote status stays
    /// the source of truth.
    pub async fn initialize(&self) -> Result<IngestReport, ApiError> {
        let records = self.source.fetch().await?;
        info!(records = records.len(), "dataset fetched");

        let lifecycle = self.lifecycle();
        lifecycle.create(&self.schema).await?;
        lifecycle.await_active(&self.schema.table_name).await?;

        let loader = BulkLoader::new(Arc::clone(&self.store), self.options.ingest_concurrency);
        let report = loader.ingest(&self.schema.table_name, records).await;
        info!(
            table = %self.schema.table_name,
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "bulk ingestion finished"
        );
        Ok(report)
    }

    /// Run the one supported query and decode the results.
    pub async fn query(&self, query: &MovieQuery) -> Result<Vec<MovieRow>, ApiError> {
        query::run_query(self.store.as_ref(), &self.schema.table_name, query).await
    }

    /// Tear the table down.
    pub async fn destroy(&self) -> Result<(), ApiError> {
        self.lifecycle().drop_table(&self.schema.table_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reeldb_core::{MemoryDatasetSource, MemoryMovieStore, MovieRecord, Rating, SourceError};

    fn dataset() -> Vec<MovieRecord> {
        vec![
            MovieRecord {
                year: 2000,
                rating: None,
                title: "Movie A".to_string(),
            },
            MovieRecord {
                year: 2000,
                rating: Some(9),
                title: "Movie B".to_string(),
            },
        ]
    }

    fn test_options() -> ReelDbOptions {
        ReelDbOptions {
            poll_interval: Duration::from_millis(1),
            max_poll_attempts: 5,
            ingest_concurrency: 4,
        }
    }

    #[tokio::test]
    async fn initialize_then_query_round_trip() {
        let db = ReelDb::new(
            MemoryMovieStore::with_activation_polls(2),
            MemoryDatasetSource::new(dataset()),
            TableSchema::new("movies", 1, 5),
        )
        .with_options(test_options());

        let report = db.initialize().await.unwrap();
        assert_eq!(report.attempted, 2);
        assert!(report.is_complete());

        let query = MovieQuery::new(2000, 0, "movie").unwrap();
        let rows = db.query(&query).await.unwrap();
        assert_eq!(rows.len(), 2);
        // store order is ascending by sort key; the sentinel sorts last
        assert_eq!(rows[0].title, "movie b");
        assert_eq!(rows[0].rating, Rating::Rated(9));
        assert_eq!(rows[1].title, "movie a");
        assert_eq!(rows[1].rating, Rating::Unrated);
    }

    #[tokio::test]
    async fn initialize_surfaces_fetch_failure() {
        let db = ReelDb::new(
            MemoryMovieStore::new(),
            MemoryDatasetSource::failing(SourceError::unavailable("no such bucket")),
            TableSchema::new("movies", 1, 5),
        )
        .with_options(test_options());

        let err = db.initialize().await.unwrap_err();
        assert!(matches!(err, ApiError::Fetch(_)));
    }

    #[tokio::test]
    async fn destroy_after_initialize_removes_table() {
        let db = ReelDb::new(
            MemoryMovieStore::new(),
            MemoryDatasetSource::new(dataset()),
            TableSchema::new("movies", 1, 5),
        )
        .with_options(test_options());

        db.initialize().await.unwrap();
        db.destroy().await.unwrap();

        let err = db.destroy().await.unwrap_err();
        assert!(matches!(err, ApiError::TableNotFound(_)));
    }
}
