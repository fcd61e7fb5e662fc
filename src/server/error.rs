use crate::query::QueryError;
use crate::upstream::UpstreamError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Error returned by the JSON handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Catalog is not available yet")]
    NotInitialized,
    #[error("{0}")]
    UpstreamTimeout(String),
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Maps a pass-through failure, naming the missing entity on 404.
    pub fn from_upstream(err: UpstreamError, what: &str) -> ApiError {
        match err {
            UpstreamError::NotFound => ApiError::NotFound(what.to_string()),
            UpstreamError::InvalidRequest(reason) => ApiError::InvalidRequest(reason),
            UpstreamError::Fetch(fetch) if fetch.timed_out => {
                ApiError::UpstreamTimeout(fetch.message)
            }
            UpstreamError::Fetch(fetch) => ApiError::Upstream(fetch.message),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotInitialized => ApiError::NotInitialized,
            QueryError::InvalidRequest(reason) => ApiError::InvalidRequest(reason),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed with {}: {}", status, self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
