mod admin_routes;
mod catalog_routes;
pub mod config;
pub mod error;
mod http_layers;
pub mod metrics;
#[allow(clippy::module_inception)]
pub mod server;
pub mod state;
mod user_routes;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
