//! LeetCode Catalog Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod background_jobs;
pub mod catalog;
pub mod config;
pub mod query;
pub mod refresh;
pub mod server;
pub mod upstream;

// Re-export commonly used types for convenience
pub use catalog::{SnapshotStore, DetailCache};
pub use refresh::RefreshCoordinator;
pub use server::{make_app, run_server, RequestsLoggingLevel};
pub use upstream::{LeetCodeClient, LeetCodeClientConfig};
