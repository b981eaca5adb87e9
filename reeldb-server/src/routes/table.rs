//! Table lifecycle endpoints: POST /create, DELETE /destroy
//!
//! Response bodies keep the legacy wire shapes (`success` / `destroyed`);
//! the richer ingestion report is logged for observability rather than
//! returned.

use crate::error::api_error_status;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reeldb_core::{DatasetSource, MovieStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Create/initialize response
#[derive(Serialize)]
pub struct CreateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Destroy response
#[derive(Serialize)]
pub struct DestroyResponse {
    pub destroyed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Provision the table and bulk-load the dataset
///
/// POST /create
pub async fn create<S, D>(State(state): State<Arc<AppState<S, D>>>) -> Response
where
    S: MovieStore + 'static,
    D: DatasetSource + 'static,
{
    info!(table = %state.db.table_name(), "table initialization requested");

    match state.db.initialize().await {
        Ok(report) => {
            if report.is_complete() {
                info!(
                    table = %state.db.table_name(),
                    attempted = report.attempted,
                    "table initialized"
                );
            } else {
                warn!(
                    table = %state.db.table_name(),
                    attempted = report.attempted,
                    succeeded = report.succeeded,
                    failed = report.failed.len(),
                    "table initialized with write failures"
                );
                for failure in &report.failed {
                    warn!(
                        title = %failure.movie.title,
                        year = failure.movie.year,
                        error = %failure.error,
                        "movie failed to load"
                    );
                }
            }
            (
                StatusCode::OK,
                Json(CreateResponse {
                    success: true,
                    error: None,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "table initialization failed");
            (
                api_error_status(&e),
                Json(CreateResponse {
                    success: false,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// Tear the table down
///
/// DELETE /destroy
pub async fn destroy<S, D>(State(state): State<Arc<AppState<S, D>>>) -> Response
where
    S: MovieStore + 'static,
    D: DatasetSource + 'static,
{
    match state.db.destroy().await {
        Ok(()) => (
            StatusCode::OK,
            Json(DestroyResponse {
                destroyed: true,
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "table teardown failed");
            (
                api_error_status(&e),
                Json(DestroyResponse {
                    destroyed: false,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
