use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub content_cache_age_sec: Option<usize>,
    pub frontend_dir_path: Option<String>,
    pub snapshot_file: Option<String>,
    pub detail_cache_size: Option<usize>,

    // Feature configs
    pub upstream: Option<UpstreamConfig>,
    pub refresh: Option<RefreshConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    pub graphql_url: Option<String>,
    /// Budget for a whole catalog fetch, all pages included.
    pub fetch_timeout_sec: Option<u64>,
    /// Budget for a single HTTP request.
    pub request_timeout_sec: Option<u64>,
    pub page_size: Option<u32>,
    pub page_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
    pub backoff_multiplier: Option<f64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
