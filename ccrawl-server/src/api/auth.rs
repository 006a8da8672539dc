//! Catalog authorization endpoint
//!
//! The client calls this on page load, since app tokens expire.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

/// GET /auth
///
/// 200 `{}` when the catalog accepted our credentials, 500 `{}` otherwise.
pub async fn authorize(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let status = if state.service.authorize().await {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({})))
}

/// Build authorization routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth", get(authorize))
}
