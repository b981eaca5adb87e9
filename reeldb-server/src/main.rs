//! ReelDB server CLI
//!
//! Run with: `cargo run -p reeldb-server -- --help`

use clap::Parser;
use reeldb_server::{init_logging, ReelServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();
    config.validate().map_err(|e| format!("configuration: {e}"))?;

    init_logging(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.listen_addr,
        region = %config.region,
        table = %config.table_name,
        bucket = %config.bucket,
        dataset_key = %config.dataset_key,
        "Starting ReelDB server"
    );

    let server = ReelServer::new(config).await?;
    server.run().await.map_err(Into::into)
}
