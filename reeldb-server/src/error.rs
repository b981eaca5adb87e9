//! Server error types and HTTP status mapping
//!
//! The three legacy endpoints each have a fixed response body shape
//! (`success` / `result` / `destroyed`), so route handlers build their own
//! failure bodies; this module supplies the status-code mapping and the
//! startup error type.

use axum::http::StatusCode;
use reeldb_api::ApiError;
use reeldb_storage_aws::AwsStorageError;
use thiserror::Error;

/// Errors raised while building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// AWS backend construction failed
    #[error("AWS backend setup failed: {0}")]
    Aws(#[from] AwsStorageError),

    /// Listener/socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Map an orchestration error to an HTTP status.
///
/// A query rejected before reaching the store is the client's fault;
/// everything else is a server-side failure.
pub fn api_error_status(error: &ApiError) -> StatusCode {
    match error {
        ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reeldb_core::InvalidQuery;

    #[test]
    fn invalid_query_maps_to_bad_request() {
        let err = ApiError::InvalidQuery(InvalidQuery("missing parameter 'year'".to_string()));
        assert_eq!(api_error_status(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_errors_map_to_internal() {
        let err = ApiError::TableNotFound("Movies".to_string());
        assert_eq!(api_error_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
