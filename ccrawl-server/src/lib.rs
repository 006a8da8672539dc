//! ccrawl-server library
//!
//! Finds an artist's live albums (albums whose title carries a single
//! performance date) and lists them chronologically, grouped by year.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod service;
pub mod spotify;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::service::LiveAlbumService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LiveAlbumService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: Arc<LiveAlbumService>) -> Self {
        Self {
            service,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::search_routes())
        .merge(api::auth_routes())
        .merge(api::health_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
