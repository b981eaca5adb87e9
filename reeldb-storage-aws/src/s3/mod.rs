//! S3 dataset source implementation
//!
//! Provides `S3DatasetSource`, which implements the core `DatasetSource`
//! trait by fetching one JSON document (an array of dataset movie entries)
//! from an S3 bucket.
//!
//! ## Timeout Configuration
//!
//! The `timeout_ms` setting controls the total operation timeout, which
//! includes SDK retry time.

use crate::error::{AwsStorageError, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_smithy_types::retry::RetryConfig;
use aws_smithy_types::timeout::TimeoutConfig;
use reeldb_core::{DatasetMovie, DatasetSource, MovieRecord, SourceError};
use std::fmt::Debug;
use std::time::Duration;

/// S3 dataset source configuration
#[derive(Debug, Clone, Default)]
pub struct S3Config {
    /// S3 bucket holding the dataset document
    pub bucket: String,
    /// Object key of the dataset document
    pub key: String,
    /// Optional endpoint override (e.g. LocalStack/MinIO)
    pub endpoint: Option<String>,
    /// Operation timeout in milliseconds (optional)
    pub timeout_ms: Option<u64>,
    /// Max retries after the initial attempt
    pub max_retries: Option<u32>,
    /// Initial backoff for retries in milliseconds (jittered by the SDK)
    pub retry_base_delay_ms: Option<u64>,
    /// Max backoff for retries in milliseconds
    pub retry_max_delay_ms: Option<u64>,
}

/// S3-backed dataset source
///
/// Fetches the whole dataset with a single `GetObject` call and decodes it
/// into domain records.
#[derive(Clone)]
pub struct S3DatasetSource {
    client: Client,
    bucket: String,
    key: String,
}

impl Debug for S3DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3DatasetSource")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .finish()
    }
}

impl S3DatasetSource {
    /// Create a new S3 dataset source.
    ///
    /// Builds the S3 client by inheriting from `sdk_config` (preserves HTTP
    /// client, credentials, sleep impl) and applying the overrides in
    /// `config`.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: S3Config) -> Result<Self> {
        if sdk_config.region().is_none() {
            return Err(AwsStorageError::MissingRegion);
        }
        if config.bucket.is_empty() || config.key.is_empty() {
            return Err(AwsStorageError::invalid_config(
                "S3 bucket and key must be non-empty",
            ));
        }

        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if config.max_retries.is_some()
            || config.retry_base_delay_ms.is_some()
            || config.retry_max_delay_ms.is_some()
        {
            // AWS SDK counts "max attempts" = initial attempt + retries
            let max_attempts = config.max_retries.unwrap_or(0).saturating_add(1).max(1);
            let mut retry_config = RetryConfig::standard().with_max_attempts(max_attempts);
            if let Some(ms) = config.retry_base_delay_ms {
                retry_config = retry_config.with_initial_backoff(Duration::from_millis(ms));
            }
            if let Some(ms) = config.retry_max_delay_ms {
                retry_config = retry_config.with_max_backoff(Duration::from_millis(ms));
            }
            builder = builder.retry_config(retry_config);
        }

        if let Some(timeout_ms) = config.timeout_ms {
            let timeout_config = TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(timeout_ms))
                .build();
            builder = builder.timeout_config(timeout_config);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket,
            key: config.key,
        })
    }

    /// Create from a pre-built client (for testing)
    pub fn from_client(client: Client, bucket: String, key: String) -> Self {
        Self {
            client,
            bucket,
            key,
        }
    }

    /// The configured bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The configured object key
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl DatasetSource for S3DatasetSource {
    async fn fetch(&self) -> std::result::Result<Vec<MovieRecord>, SourceError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .map_err(|e| map_s3_error(e, &self.key))?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| SourceError::unavailable(format!("failed to read S3 body: {e}")))?
            .into_bytes();

        let movies: Vec<DatasetMovie> = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::malformed(format!("dataset is not a movie array: {e}")))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %self.key,
            records = movies.len(),
            "dataset document fetched"
        );

        Ok(movies.into_iter().map(MovieRecord::from).collect())
    }
}

/// Map an SDK error to SourceError, classifying by HTTP status where possible
fn map_s3_error<E: std::fmt::Debug>(
    err: aws_sdk_s3::error::SdkError<E>,
    key: &str,
) -> SourceError {
    use aws_sdk_s3::error::SdkError;

    match &err {
        SdkError::ServiceError(service_err) => {
            let status = service_err.raw().status().as_u16();
            match status {
                404 => SourceError::unavailable(format!("dataset object not found: {key}")),
                403 => SourceError::unavailable(format!("access denied for key '{key}'")),
                _ => SourceError::unavailable(format!(
                    "S3 error for key '{key}' (HTTP {status}): {err:?}"
                )),
            }
        }
        SdkError::TimeoutError(_) => {
            SourceError::unavailable(format!("S3 timeout for key '{key}': {err:?}"))
        }
        SdkError::DispatchFailure(_) => {
            SourceError::unavailable(format!("S3 connection error for key '{key}': {err:?}"))
        }
        _ => SourceError::unavailable(format!("S3 error for key '{key}': {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_config_default_is_empty() {
        let config = S3Config::default();
        assert!(config.bucket.is_empty());
        assert!(config.key.is_empty());
        assert!(config.endpoint.is_none());
        assert!(config.timeout_ms.is_none());
    }

    #[test]
    fn dataset_document_decodes_to_records() {
        let doc = r#"[
            {"year": 2000, "info": {}, "title": "Movie A"},
            {"year": 2000, "info": {"rating": 9}, "title": "Movie B"}
        ]"#;
        let movies: Vec<DatasetMovie> = serde_json::from_str(doc).unwrap();
        let records: Vec<MovieRecord> = movies.into_iter().map(MovieRecord::from).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rating, None);
        assert_eq!(records[1].rating, Some(9));
    }
}
