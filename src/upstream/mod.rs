//! Access to the upstream problem catalog.

mod client;
mod queries;

pub use client::{LeetCodeClient, LeetCodeClientConfig, DEFAULT_GRAPHQL_URL};

use crate::catalog::RawRecord;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Network trouble, timeouts, 429 or 5xx. Worth retrying.
    Transient,
    /// Anything retrying will not fix: 4xx, GraphQL errors, unexpected shapes.
    Permanent,
}

#[derive(Debug, Clone, Error)]
#[error("{kind:?} upstream failure: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
    pub timed_out: bool,
}

impl FetchError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transient,
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Permanent,
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transient,
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind == FetchErrorKind::Transient
    }
}

/// Errors of the live pass-through queries.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Not found")]
    NotFound,
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Source of the full raw catalog.
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<RawRecord>, FetchError>;
}
