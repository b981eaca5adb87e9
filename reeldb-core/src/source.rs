//! The dataset source trait seam

use crate::error::SourceError;
use crate::movie::MovieRecord;
use async_trait::async_trait;
use std::fmt::Debug;

/// Provider of the bulk movie collection to ingest.
///
/// The production implementation fetches a JSON document from blob storage
/// (`reeldb-storage-aws`); tests use [`crate::memory::MemoryDatasetSource`].
#[async_trait]
pub trait DatasetSource: Debug + Send + Sync {
    /// Fetch and decode the full record collection.
    async fn fetch(&self) -> Result<Vec<MovieRecord>, SourceError>;
}
