//! Error types for the AWS backends

use thiserror::Error;

/// Errors from constructing or configuring the AWS backends.
#[derive(Debug, Error)]
pub enum AwsStorageError {
    /// Missing region configuration
    #[error("missing AWS region configuration")]
    MissingRegion,

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl AwsStorageError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type for AWS backend construction.
pub type Result<T> = std::result::Result<T, AwsStorageError>;
