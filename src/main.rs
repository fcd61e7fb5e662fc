use anyhow::{Context, Result};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use leetcode_catalog_server::background_jobs::jobs::CatalogRefreshJob;
use leetcode_catalog_server::background_jobs::{create_scheduler, HookEvent, JobContext};
use leetcode_catalog_server::catalog::{DetailCache, SnapshotFile, SnapshotStore};
use leetcode_catalog_server::config;
use leetcode_catalog_server::refresh::{RefreshCoordinator, RetryPolicy};
use leetcode_catalog_server::server::{metrics, ServerConfig};
use leetcode_catalog_server::upstream::LeetCodeClient;
use leetcode_catalog_server::{run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The maximum age of catalog responses in client caches, in seconds.
    #[clap(long, default_value_t = 3600)]
    pub content_cache_age_sec: usize,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// GraphQL endpoint of the upstream catalog.
    #[clap(long)]
    pub upstream_url: Option<String>,

    /// Upper bound in seconds for one full catalog fetch.
    #[clap(long, default_value_t = 300)]
    pub fetch_timeout_sec: u64,

    /// File the last good catalog is persisted to and seeded from at startup.
    #[clap(long, value_parser = parse_path)]
    pub snapshot_file: Option<PathBuf>,

    /// Number of full problem details kept in memory.
    #[clap(long, default_value_t = 500)]
    pub detail_cache_size: usize,

    /// Seconds between scheduled catalog refreshes.
    #[clap(long, default_value_t = 3600)]
    pub refresh_interval_secs: u64,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            content_cache_age_sec: args.content_cache_age_sec,
            frontend_dir_path: args.frontend_dir_path.clone(),
            upstream_url: args.upstream_url.clone(),
            fetch_timeout_sec: args.fetch_timeout_sec,
            snapshot_file: args.snapshot_file.clone(),
            detail_cache_size: args.detail_cache_size,
            refresh_interval_secs: args.refresh_interval_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  upstream: {}", app_config.upstream.graphql_url);
    info!("  snapshot_file: {:?}", app_config.snapshot_file);
    info!("  refresh interval: {}s", app_config.refresh.interval_secs);
    info!("  port: {}", app_config.port);

    info!("Initializing metrics...");
    metrics::init_metrics();

    let upstream = Arc::new(LeetCodeClient::new(app_config.upstream.client_config())?);
    let store = Arc::new(SnapshotStore::new());
    let snapshot_file = app_config.snapshot_file.clone().map(SnapshotFile::new);

    let coordinator = Arc::new(RefreshCoordinator::new(
        store,
        upstream.clone(),
        RetryPolicy::new(&app_config.refresh),
        app_config.upstream.fetch_timeout(),
        snapshot_file.clone(),
    ));

    // A persisted catalog lets us serve before the first upstream fetch completes
    if let Some(file) = &snapshot_file {
        coordinator.seed_from_file(file);
    }

    let detail_cache_size =
        NonZeroUsize::new(app_config.detail_cache_size).context("detail_cache_size is 0")?;
    let detail_cache = Arc::new(DetailCache::new(detail_cache_size));

    // Set up background job scheduler
    let shutdown_token = CancellationToken::new();
    let (hook_sender, hook_receiver) = tokio::sync::mpsc::channel::<HookEvent>(100);

    let job_context = JobContext::new(
        shutdown_token.child_token(),
        coordinator.clone(),
        tokio::runtime::Handle::current(),
    );

    let (mut scheduler, scheduler_handle) =
        create_scheduler(hook_receiver, shutdown_token.clone(), job_context);

    scheduler
        .register_job(Arc::new(CatalogRefreshJob::from_settings(
            &app_config.refresh,
        )))
        .await;

    info!(
        "Job scheduler initialized with {} job(s)",
        scheduler.job_count().await
    );

    // OnStartup is fired by the scheduler itself; the sender only keeps the channel open
    let _hook_sender = hook_sender;

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        metrics_port: app_config.metrics_port,
        content_cache_age_sec: app_config.content_cache_age_sec,
        frontend_dir_path: app_config.frontend_dir_path.clone(),
    };

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);

    // Run HTTP server and job scheduler concurrently
    tokio::select! {
        result = run_server(
            server_config,
            coordinator,
            upstream,
            detail_cache,
            Some(scheduler_handle),
        ) => {
            info!("HTTP server stopped: {:?}", result);
            shutdown_token.cancel();
            result
        },
        _ = scheduler.run() => {
            info!("Scheduler stopped");
            Ok(())
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown");
            shutdown_token.cancel();
            // Give the scheduler a moment to shut down gracefully
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(())
        }
    }
}
