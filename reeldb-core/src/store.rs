//! The managed-table trait seam
//!
//! [`MovieStore`] is the boundary between orchestration and the managed
//! key-value table. The production implementation lives in
//! `reeldb-storage-aws`; tests use [`crate::memory::MemoryMovieStore`].

use crate::error::StoreError;
use crate::movie::StoredMovie;
use crate::query::MovieQuery;
use async_trait::async_trait;
use std::fmt::Debug;

/// Declared key schema and capacity for the movie table.
///
/// The key layout itself is fixed (`yr` numeric HASH, `rating` numeric
/// RANGE); only the name and provisioned capacity vary. Immutable once the
/// table exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub read_capacity: i64,
    pub write_capacity: i64,
}

impl TableSchema {
    pub fn new(table_name: impl Into<String>, read_capacity: i64, write_capacity: i64) -> Self {
        Self {
            table_name: table_name.into(),
            read_capacity,
            write_capacity,
        }
    }
}

/// Remote table status, re-derived from a describe call on every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Creating,
    Active,
    Deleting,
    /// A status this system does not track (e.g. UPDATING)
    Unknown(String),
}

/// Operations against the managed movie table.
///
/// Implementations must be safe for concurrent use: each operation builds
/// its own request and no shared request state is mutated.
#[async_trait]
pub trait MovieStore: Debug + Send + Sync {
    /// Begin asynchronous provisioning of the table.
    ///
    /// Returns `StoreError::AlreadyExists` if a table with the same name
    /// exists. Success does not imply the table is ready for traffic.
    async fn create_table(&self, schema: &TableSchema) -> Result<(), StoreError>;

    /// Describe the table and report its current status.
    ///
    /// Returns `StoreError::NotFound` if the table does not exist.
    async fn table_status(&self, table: &str) -> Result<TableStatus, StoreError>;

    /// Delete the table.
    ///
    /// Returns `StoreError::NotFound` if the table does not exist - callers
    /// distinguish that from a transport failure.
    async fn delete_table(&self, table: &str) -> Result<(), StoreError>;

    /// Write one encoded movie. Items sharing the (yr, rating) key overwrite
    /// each other; last write wins.
    async fn put_movie(&self, table: &str, movie: &StoredMovie) -> Result<(), StoreError>;

    /// Run the one supported access pattern and return matching items in the
    /// store's native sort-key order.
    async fn query_movies(
        &self,
        table: &str,
        query: &MovieQuery,
    ) -> Result<Vec<StoredMovie>, StoreError>;
}
