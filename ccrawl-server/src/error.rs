//! Error types for ccrawl-server
//!
//! Classification outcomes (no artist, no live albums, ...) are regular
//! `success:false` bodies. Only transport and internal failures become
//! `ApiError`s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream catalog failure
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::Catalog(CatalogError::RateLimitExceeded) => {
                (StatusCode::SERVICE_UNAVAILABLE, "RATE_LIMITED")
            }
            ApiError::Catalog(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        tracing::error!(code = error_code, error = %self, "Request failed");

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = ApiError::Catalog(CatalogError::NetworkError("down".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = ApiError::Catalog(CatalogError::RateLimitExceeded).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = ApiError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
