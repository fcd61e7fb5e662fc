//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own mock upstream and catalog.

use super::constants::*;
use super::fixtures;
use super::upstream::MockUpstream;
use leetcode_catalog_server::background_jobs::jobs::CatalogRefreshJob;
use leetcode_catalog_server::background_jobs::{create_scheduler, HookEvent, JobContext};
use leetcode_catalog_server::catalog::{DetailCache, SnapshotFile, SnapshotStore};
use leetcode_catalog_server::config::RefreshSettings;
use leetcode_catalog_server::refresh::{RefreshCoordinator, RefreshOutcome, RetryPolicy};
use leetcode_catalog_server::server::state::ServerState;
use leetcode_catalog_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use leetcode_catalog_server::upstream::{LeetCodeClient, LeetCodeClientConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct SpawnOptions {
    warm: bool,
    with_scheduler: bool,
    seed_from_file: bool,
}

/// Test server instance backed by a mock upstream
///
/// When dropped, the server, the mock upstream and the scheduler shut down
/// and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// The mock upstream, for flipping failure switches and counting calls
    pub upstream: MockUpstream,

    /// The coordinator, for driving refreshes directly
    pub coordinator: Arc<RefreshCoordinator>,

    /// Where the catalog is persisted after each publish
    pub snapshot_path: std::path::PathBuf,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    _scheduler_token: CancellationToken,
}

impl TestServer {
    /// Spawns a server whose catalog was already refreshed once
    pub async fn spawn() -> Self {
        Self::spawn_with(SpawnOptions {
            warm: true,
            ..Default::default()
        })
        .await
    }

    /// Spawns a server that never fetched the catalog, with the upstream
    /// problem list failing
    pub async fn spawn_cold() -> Self {
        Self::spawn_with(SpawnOptions::default()).await
    }

    /// Spawns a warm server with the background job scheduler running
    pub async fn spawn_with_scheduler() -> Self {
        Self::spawn_with(SpawnOptions {
            warm: true,
            with_scheduler: true,
            ..Default::default()
        })
        .await
    }

    /// Spawns a server that starts cold with the upstream problem list
    /// failing, seeded from a snapshot file left by a previous run
    pub async fn spawn_from_snapshot_file() -> Self {
        Self::spawn_with(SpawnOptions {
            seed_from_file: true,
            ..Default::default()
        })
        .await
    }

    async fn spawn_with(options: SpawnOptions) -> Self {
        let upstream = MockUpstream::spawn().await;
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let snapshot_path = temp_dir.path().join("catalog.json");

        let client = Arc::new(
            LeetCodeClient::new(LeetCodeClientConfig {
                graphql_url: upstream.graphql_url.clone(),
                timeout: Duration::from_secs(5),
                page_size: UPSTREAM_PAGE_SIZE,
                page_delay: Duration::ZERO,
            })
            .expect("Failed to create upstream client"),
        );

        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::new(SnapshotStore::new()),
            client.clone(),
            RetryPolicy {
                max_retries: 1,
                initial_backoff_ms: 10,
                max_backoff_ms: 10,
                backoff_multiplier: 1.0,
            },
            Duration::from_secs(10),
            Some(SnapshotFile::new(&snapshot_path)),
        ));

        if options.seed_from_file {
            let content = serde_json::to_string(&fixtures::problem_records())
                .expect("Failed to serialize fixture records");
            std::fs::write(&snapshot_path, content).expect("Failed to write snapshot file");
            assert!(
                coordinator.seed_from_file(&SnapshotFile::new(&snapshot_path)),
                "Snapshot file was not used"
            );
        }

        if options.warm {
            let outcome = coordinator.refresh().await;
            assert!(
                matches!(outcome, RefreshOutcome::Published { .. }),
                "Initial refresh failed: {:?}",
                outcome
            );
        } else {
            upstream.set_catalog_failing(true);
        }

        let scheduler_token = CancellationToken::new();
        let scheduler_handle = if options.with_scheduler {
            let (hook_sender, hook_receiver) = tokio::sync::mpsc::channel::<HookEvent>(10);
            let job_context = JobContext::new(
                scheduler_token.child_token(),
                coordinator.clone(),
                tokio::runtime::Handle::current(),
            );
            let (mut scheduler, handle) =
                create_scheduler(hook_receiver, scheduler_token.clone(), job_context);
            scheduler
                .register_job(Arc::new(CatalogRefreshJob::from_settings(
                    &RefreshSettings::default(),
                )))
                .await;
            tokio::spawn(async move {
                // Held for as long as the scheduler runs
                let _hook_sender = hook_sender;
                scheduler.run().await;
            });
            Some(handle)
        } else {
            None
        };

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Build the app
        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            content_cache_age_sec: 60,
            ..Default::default()
        };

        let state = ServerState::new(
            config.clone(),
            coordinator.clone(),
            client,
            Arc::new(DetailCache::default()),
            scheduler_handle,
        );
        let app = make_app(config, state).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            upstream,
            coordinator,
            snapshot_path,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
            _scheduler_token: scheduler_token,
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    // Server is ready
                    return;
                }
                _ => {
                    // Server not ready yet, wait and retry
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        self._scheduler_token.cancel();
        // TempDir will be cleaned up automatically
    }
}
