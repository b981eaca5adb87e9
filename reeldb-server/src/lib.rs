//! ReelDB HTTP Server
//!
//! A thin HTTP facade over `reeldb-api`, exposing three operations:
//!
//! - `POST /create` - fetch the dataset from S3, provision the DynamoDB
//!   table, wait for it to become active, bulk-load the records
//! - `GET /query` - year / minimum-rating / title-fragment query
//! - `DELETE /destroy` - delete the table
//!
//! All business logic lives below this crate; handlers only translate
//! between HTTP and the orchestration layer.
//!
//! # Example
//!
//! ```ignore
//! use reeldb_server::{ReelServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let server = ReelServer::new(config).await.unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::ServerError;
pub use routes::build_router;
pub use state::{AppState, AwsAppState};
pub use telemetry::init_logging;

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// ReelDB HTTP server over the AWS backends
pub struct ReelServer {
    state: Arc<AwsAppState>,
    router: Router,
}

impl ReelServer {
    /// Create a new server with the given configuration
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let state = Arc::new(AwsAppState::from_aws(config).await?);
        let router = routes::build_router(state.clone());
        Ok(Self { state, router })
    }

    /// Get a reference to the application state
    pub fn state(&self) -> &Arc<AwsAppState> {
        &self.state
    }

    /// Get the router for testing
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.state.config.listen_addr;
        let listener = TcpListener::bind(addr).await?;

        info!(
            addr = %addr,
            table = %self.state.config.table_name,
            bucket = %self.state.config.bucket,
            cors = self.state.config.cors_enabled,
            "ReelDB server starting"
        );

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
