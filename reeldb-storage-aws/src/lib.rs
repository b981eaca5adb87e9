//! AWS backends for ReelDB
//!
//! This crate provides the production implementations of the core trait
//! seams:
//!
//! - **S3 dataset source**: fetches the bulk movie dataset as a single JSON
//!   document from an S3 bucket
//! - **DynamoDB movie store**: table lifecycle, item writes, and the native
//!   query/filter translation against a DynamoDB table keyed on
//!   (`yr` HASH, `rating` RANGE)
//!
//! ## Usage
//!
//! ```ignore
//! use reeldb_storage_aws::{DynamoConfig, DynamoMovieStore, S3Config, S3DatasetSource};
//!
//! // Load AWS SDK config once; each backend inherits and overrides it
//! let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
//!
//! let source = S3DatasetSource::new(&sdk_config, S3Config {
//!     bucket: "csu44000assignment220".to_string(),
//!     key: "moviedata.json".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let store = DynamoMovieStore::new(&sdk_config, DynamoConfig::default())?;
//! ```

pub mod dynamodb;
pub mod error;
pub mod s3;

pub use dynamodb::{DynamoConfig, DynamoMovieStore};
pub use error::{AwsStorageError, Result};
pub use s3::{S3Config, S3DatasetSource};

// Re-export the trait seams for convenience
pub use reeldb_core::{DatasetSource, MovieStore};
