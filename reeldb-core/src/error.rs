//! Error types for the core trait seams

use thiserror::Error;

/// Errors surfaced by [`crate::store::MovieStore`] implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Table already exists (create)
    #[error("table already exists: {0}")]
    AlreadyExists(String),

    /// Table not found (describe/delete/query)
    #[error("table not found: {0}")]
    NotFound(String),

    /// Rate limited by the store; safe to retry with backoff
    #[error("throttled: {0}")]
    Throttled(String),

    /// Operation timed out; safe to retry with backoff
    #[error("timeout: {0}")]
    Timeout(String),

    /// Network or connection error
    #[error("I/O error: {0}")]
    Io(String),

    /// Request rejected as invalid by the store
    #[error("invalid request: {0}")]
    Invalid(String),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn already_exists(table: impl Into<String>) -> Self {
        Self::AlreadyExists(table.into())
    }

    pub fn not_found(table: impl Into<String>) -> Self {
        Self::NotFound(table.into())
    }

    pub fn throttled(msg: impl Into<String>) -> Self {
        Self::Throttled(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether a retry with backoff may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Throttled(_) | Self::Timeout(_))
    }
}

/// Errors surfaced by [`crate::source::DatasetSource`] implementations.
///
/// The source is opaque to callers: a failure is either "could not get the
/// document" or "got it but could not make sense of it".
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Dataset could not be fetched (network, auth, missing object)
    #[error("dataset unavailable: {0}")]
    Unavailable(String),

    /// Dataset was fetched but is not a valid movie collection
    #[error("malformed dataset: {0}")]
    Malformed(String),
}

impl SourceError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// A query request that failed validation before reaching the store.
#[derive(Debug, Clone, Error)]
#[error("invalid query: {0}")]
pub struct InvalidQuery(pub String);
