//! Live album search endpoints
//!
//! Every classification outcome is a 200 with a `success` flag; only
//! upstream and internal failures produce error statuses.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use crate::classify::{FailureReason, LiveAlbumsResponse};
use crate::error::ApiResult;
use crate::AppState;

/// GET /search/:query
///
/// `query` is the artist name with words separated by dashes
/// (`grateful-dead`).
pub async fn search(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> ApiResult<Json<LiveAlbumsResponse>> {
    info!(query = %query, "Live album search");
    let response = state.service.search(&query).await?;
    Ok(Json(response))
}

/// GET /search/ with no query
pub async fn empty_query() -> Json<LiveAlbumsResponse> {
    Json(LiveAlbumsResponse::failure(FailureReason::EmptyQuery))
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/search/:query", get(search))
        .route("/search/", get(empty_query))
        .route("/search", get(empty_query))
}
