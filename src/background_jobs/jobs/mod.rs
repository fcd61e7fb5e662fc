//! Specific background job implementations.

pub mod catalog_refresh;

pub use catalog_refresh::CatalogRefreshJob;
