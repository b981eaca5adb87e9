//! Query endpoint: GET /query
//!
//! Parameters are validated into a [`MovieQuery`] before any store call;
//! a malformed request never reaches the network.

use crate::error::api_error_status;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reeldb_api::ApiError;
use reeldb_core::{DatasetSource, MovieQuery, MovieRow, MovieStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Raw query parameters; parsed and validated by [`MovieQuery::from_params`]
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    year: Option<String>,
    rating: Option<String>,
    name: Option<String>,
}

/// Query response with the legacy wire shape
#[derive(Serialize)]
pub struct QueryResponse {
    pub result: Vec<MovieRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query movies by year, minimum rating, and title fragment
///
/// GET /query?year=<int>&rating=<int>&name=<substring>
pub async fn query<S, D>(
    State(state): State<Arc<AppState<S, D>>>,
    Query(params): Query<QueryParams>,
) -> Response
where
    S: MovieStore + 'static,
    D: DatasetSource + 'static,
{
    let request = match MovieQuery::from_params(
        params.year.as_deref(),
        params.rating.as_deref(),
        params.name.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) => {
            let e = ApiError::from(e);
            warn!(error = %e, "rejected malformed query");
            return (
                api_error_status(&e),
                Json(QueryResponse {
                    result: Vec::new(),
                    error: Some(e.to_string()),
                }),
            )
                .into_response();
        }
    };

    match state.db.query(&request).await {
        Ok(result) => {
            debug!(
                year = request.year,
                min_rating = request.min_rating,
                matches = result.len(),
                "query executed"
            );
            (
                StatusCode::OK,
                Json(QueryResponse {
                    result,
                    error: None,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "query failed");
            (
                api_error_status(&e),
                Json(QueryResponse {
                    result: Vec::new(),
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
