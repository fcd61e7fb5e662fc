//! Read side of the catalog.

mod engine;
mod filter;

pub use engine::{ProblemRef, ProblemSet, QueryEngine, TagSummary};
pub use filter::ProblemFilter;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Catalog is not available yet")]
    NotInitialized,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
