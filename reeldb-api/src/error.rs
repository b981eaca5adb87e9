//! Error types for the orchestration layer
//!
//! Each variant names the stage that failed so callers (and logs) can tell
//! fetch, provisioning, ingestion, query, and teardown failures apart.

use reeldb_core::{InvalidQuery, SourceError, StoreError};
use thiserror::Error;

/// Errors from the orchestration layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Dataset could not be fetched or decoded
    #[error("dataset fetch failed: {0}")]
    Fetch(#[from] SourceError),

    /// Table already exists
    #[error("table already exists: {0}")]
    TableExists(String),

    /// Table creation was rejected
    #[error("table provisioning failed: {0}")]
    Provisioning(StoreError),

    /// Table never became active within the poll budget
    #[error("table '{table}' did not become active within {attempts} polls")]
    ProvisioningTimeout { table: String, attempts: u32 },

    /// Status polling failed after exhausting transient retries
    #[error("table status check failed: {0}")]
    Describe(StoreError),

    /// Query request failed validation (no network call was made)
    #[error(transparent)]
    InvalidQuery(#[from] InvalidQuery),

    /// Query execution failed at the store
    #[error("query execution failed: {0}")]
    Query(StoreError),

    /// Table to delete does not exist
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Table deletion failed
    #[error("table deletion failed: {0}")]
    Drop(StoreError),
}
