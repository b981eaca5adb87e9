//! Server configuration

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// ReelDB HTTP server configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "reeldb-server")]
#[command(about = "ReelDB movie table HTTP service")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "REELDB_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// S3 bucket holding the movie dataset document
    #[arg(long, env = "REELDB_BUCKET", default_value = "csu44000assignment220")]
    pub bucket: String,

    /// Object key of the movie dataset document
    #[arg(long, env = "REELDB_DATASET_KEY", default_value = "moviedata.json")]
    pub dataset_key: String,

    /// Name of the managed movie table
    #[arg(long, env = "REELDB_TABLE_NAME", default_value = "Movies")]
    pub table_name: String,

    /// AWS region
    #[arg(long, env = "REELDB_REGION", default_value = "eu-west-1")]
    pub region: String,

    /// S3 endpoint override (e.g. LocalStack)
    #[arg(long, env = "REELDB_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// DynamoDB endpoint override (e.g. LocalStack)
    #[arg(long, env = "REELDB_DYNAMODB_ENDPOINT")]
    pub dynamodb_endpoint: Option<String>,

    /// Provisioned read capacity units for the table
    #[arg(long, env = "REELDB_READ_CAPACITY", default_value = "1")]
    pub read_capacity: i64,

    /// Provisioned write capacity units for the table
    #[arg(long, env = "REELDB_WRITE_CAPACITY", default_value = "5")]
    pub write_capacity: i64,

    /// Enable CORS (Cross-Origin Resource Sharing)
    #[arg(long, env = "REELDB_CORS_ENABLED", default_value = "true")]
    pub cors_enabled: bool,

    /// Milliseconds between table status polls during provisioning
    #[arg(long, env = "REELDB_POLL_INTERVAL_MS", default_value = "2000")]
    pub poll_interval_ms: u64,

    /// Status polls before provisioning is reported as timed out
    #[arg(long, env = "REELDB_POLL_MAX_ATTEMPTS", default_value = "60")]
    pub poll_max_attempts: u32,

    /// Concurrent writes during bulk ingestion
    #[arg(long, env = "REELDB_INGEST_CONCURRENCY", default_value = "16")]
    pub ingest_concurrency: usize,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "REELDB_LOG", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// Validate configuration at startup.
    pub fn validate(&self) -> Result<(), String> {
        if self.bucket.is_empty() || self.dataset_key.is_empty() {
            return Err("bucket and dataset key must be non-empty".to_string());
        }
        if self.table_name.is_empty() {
            return Err("table name must be non-empty".to_string());
        }
        if self.read_capacity < 1 || self.write_capacity < 1 {
            return Err("provisioned capacities must be at least 1".to_string());
        }
        if self.poll_max_attempts == 0 {
            return Err("--poll-max-attempts must be at least 1".to_string());
        }
        if self.ingest_concurrency == 0 {
            return Err("--ingest-concurrency must be at least 1".to_string());
        }
        Ok(())
    }

    /// Poll interval as a Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        // Defaults mirror the clap attribute defaults
        Self {
            listen_addr: "0.0.0.0:8080".parse().expect("valid default addr"),
            bucket: "csu44000assignment220".to_string(),
            dataset_key: "moviedata.json".to_string(),
            table_name: "Movies".to_string(),
            region: "eu-west-1".to_string(),
            s3_endpoint: None,
            dynamodb_endpoint: None,
            read_capacity: 1,
            write_capacity: 5,
            cors_enabled: true,
            poll_interval_ms: 2000,
            poll_max_attempts: 60,
            ingest_concurrency: 16,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = ServerConfig {
            write_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_poll_budget_is_rejected() {
        let config = ServerConfig {
            poll_max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
