mod file_config;

pub use file_config::{FileConfig, RefreshConfig, UpstreamConfig};

use crate::catalog::DEFAULT_DETAIL_CACHE_SIZE;
use crate::server::RequestsLoggingLevel;
use crate::upstream::{LeetCodeClientConfig, DEFAULT_GRAPHQL_URL};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

const MAX_PAGE_SIZE: u32 = 100;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub upstream_url: Option<String>,
    pub fetch_timeout_sec: u64,
    pub snapshot_file: Option<PathBuf>,
    pub detail_cache_size: usize,
    pub refresh_interval_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            content_cache_age_sec: 3600,
            frontend_dir_path: None,
            upstream_url: None,
            fetch_timeout_sec: UpstreamSettings::DEFAULT_FETCH_TIMEOUT_SEC,
            snapshot_file: None,
            detail_cache_size: DEFAULT_DETAIL_CACHE_SIZE,
            refresh_interval_secs: RefreshSettings::DEFAULT_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub snapshot_file: Option<PathBuf>,
    pub detail_cache_size: usize,

    // Feature configs (with defaults)
    pub upstream: UpstreamSettings,
    pub refresh: RefreshSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let snapshot_file = file
            .snapshot_file
            .map(PathBuf::from)
            .or_else(|| cli.snapshot_file.clone());
        if let Some(path) = &snapshot_file {
            if path.is_dir() {
                bail!("snapshot_file points to a directory: {:?}", path);
            }
        }

        let detail_cache_size = file.detail_cache_size.unwrap_or(cli.detail_cache_size);
        if detail_cache_size == 0 {
            bail!("detail_cache_size must be greater than 0");
        }

        // Upstream settings - [upstream] section wins over CLI flags
        let up_file = file.upstream.unwrap_or_default();
        let upstream = UpstreamSettings {
            graphql_url: up_file
                .graphql_url
                .or_else(|| cli.upstream_url.clone())
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
            fetch_timeout_sec: up_file.fetch_timeout_sec.unwrap_or(cli.fetch_timeout_sec),
            request_timeout_sec: up_file
                .request_timeout_sec
                .unwrap_or(UpstreamSettings::DEFAULT_REQUEST_TIMEOUT_SEC),
            page_size: up_file
                .page_size
                .unwrap_or(UpstreamSettings::DEFAULT_PAGE_SIZE),
            page_delay_ms: up_file
                .page_delay_ms
                .unwrap_or(UpstreamSettings::DEFAULT_PAGE_DELAY_MS),
        };
        if !(1..=MAX_PAGE_SIZE).contains(&upstream.page_size) {
            bail!(
                "upstream.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE,
                upstream.page_size
            );
        }
        if upstream.fetch_timeout_sec == 0 || upstream.request_timeout_sec == 0 {
            bail!("upstream timeouts must be greater than 0");
        }

        let refresh_file = file.refresh.unwrap_or_default();
        let defaults = RefreshSettings::default();
        let refresh = RefreshSettings {
            interval_secs: refresh_file
                .interval_secs
                .unwrap_or(cli.refresh_interval_secs),
            max_retries: refresh_file.max_retries.unwrap_or(defaults.max_retries),
            initial_backoff_ms: refresh_file
                .initial_backoff_ms
                .unwrap_or(defaults.initial_backoff_ms),
            max_backoff_ms: refresh_file
                .max_backoff_ms
                .unwrap_or(defaults.max_backoff_ms),
            backoff_multiplier: refresh_file
                .backoff_multiplier
                .unwrap_or(defaults.backoff_multiplier),
        };
        if refresh.interval_secs == 0 {
            bail!("refresh.interval_secs must be greater than 0");
        }
        if refresh.backoff_multiplier < 1.0 {
            bail!(
                "refresh.backoff_multiplier must be at least 1.0, got {}",
                refresh.backoff_multiplier
            );
        }

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            snapshot_file,
            detail_cache_size,
            upstream,
            refresh,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub graphql_url: String,
    pub fetch_timeout_sec: u64,
    pub request_timeout_sec: u64,
    pub page_size: u32,
    pub page_delay_ms: u64,
}

impl UpstreamSettings {
    pub const DEFAULT_FETCH_TIMEOUT_SEC: u64 = 300;
    pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;
    pub const DEFAULT_PAGE_SIZE: u32 = 100;
    pub const DEFAULT_PAGE_DELAY_MS: u64 = 300;

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_sec)
    }

    pub fn client_config(&self) -> LeetCodeClientConfig {
        LeetCodeClientConfig {
            graphql_url: self.graphql_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_sec),
            page_size: self.page_size,
            page_delay: Duration::from_millis(self.page_delay_ms),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            fetch_timeout_sec: Self::DEFAULT_FETCH_TIMEOUT_SEC,
            request_timeout_sec: Self::DEFAULT_REQUEST_TIMEOUT_SEC,
            page_size: Self::DEFAULT_PAGE_SIZE,
            page_delay_ms: Self::DEFAULT_PAGE_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub interval_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
}

impl RefreshSettings {
    pub const DEFAULT_INTERVAL_SECS: u64 = 3600;
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: Self::DEFAULT_INTERVAL_SECS,
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
