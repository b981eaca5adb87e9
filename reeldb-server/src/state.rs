//! Application state
//!
//! `AppState` is generic over the store and source so the integration tests
//! can drive the real router with the in-memory doubles; production uses
//! the AWS-backed alias built by [`AppState::from_aws`].

use crate::config::ServerConfig;
use crate::error::ServerError;
use aws_config::{BehaviorVersion, Region};
use reeldb_api::{ReelDb, ReelDbOptions};
use reeldb_core::{DatasetSource, MovieStore, TableSchema};
use reeldb_storage_aws::{DynamoConfig, DynamoMovieStore, S3Config, S3DatasetSource};

/// Shared per-request state: configuration plus the movie table service.
#[derive(Debug)]
pub struct AppState<S, D> {
    pub config: ServerConfig,
    pub db: ReelDb<S, D>,
}

/// Production state: DynamoDB store + S3 dataset source.
pub type AwsAppState = AppState<DynamoMovieStore, S3DatasetSource>;

impl<S: MovieStore + 'static, D: DatasetSource> AppState<S, D> {
    /// Build state over explicit backends (used by tests).
    pub fn new(config: ServerConfig, store: S, source: D) -> Self {
        let schema = TableSchema::new(
            config.table_name.clone(),
            config.read_capacity,
            config.write_capacity,
        );
        let options = ReelDbOptions {
            poll_interval: config.poll_interval(),
            max_poll_attempts: config.poll_max_attempts,
            ingest_concurrency: config.ingest_concurrency,
        };
        let db = ReelDb::new(store, source, schema).with_options(options);
        Self { config, db }
    }
}

impl AwsAppState {
    /// Build production state from the ambient AWS credential chain.
    pub async fn from_aws(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::config)?;

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let store = DynamoMovieStore::new(
            &sdk_config,
            DynamoConfig {
                endpoint: config.dynamodb_endpoint.clone(),
                ..Default::default()
            },
        )?;

        let source = S3DatasetSource::new(
            &sdk_config,
            S3Config {
                bucket: config.bucket.clone(),
                key: config.dataset_key.clone(),
                endpoint: config.s3_endpoint.clone(),
                ..Default::default()
            },
        )?;

        Ok(Self::new(config, store, source))
    }
}
