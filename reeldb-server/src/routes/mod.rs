//! HTTP route handlers and router configuration

mod admin;
mod query;
mod table;

use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use reeldb_core::{DatasetSource, MovieStore};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the main application router
pub fn build_router<S, D>(state: Arc<AppState<S, D>>) -> Router
where
    S: MovieStore + 'static,
    D: DatasetSource + 'static,
{
    let cors_enabled = state.config.cors_enabled;

    let mut router = Router::new()
        // Health check
        .route("/health", get(admin::health))
        // Table lifecycle + ingestion
        .route("/create", post(table::create::<S, D>))
        .route("/destroy", delete(table::destroy::<S, D>))
        // Query endpoint
        .route("/query", get(query::query::<S, D>))
        .with_state(state);

    // Add middleware
    router = router.layer(TraceLayer::new_for_http());

    // Add CORS if enabled
    if cors_enabled {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}
