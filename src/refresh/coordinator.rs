use super::retry_policy::RetryPolicy;
use crate::catalog::{build_snapshot, BuildError, RawRecord, Snapshot, SnapshotFile, SnapshotStore};
use crate::server::metrics;
use crate::upstream::{FetchError, FetchErrorKind, UpstreamFetcher};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPhase {
    Idle,
    Fetching,
    Building,
    Publishing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FetchTransient,
    FetchPermanent,
    BuildFailure,
}

impl From<FetchErrorKind> for ErrorKind {
    fn from(kind: FetchErrorKind) -> Self {
        match kind {
            FetchErrorKind::Transient => ErrorKind::FetchTransient,
            FetchErrorKind::Permanent => ErrorKind::FetchPermanent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    pub attempts: u32,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerOutcome {
    Started,
    AlreadyInProgress,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Published {
        sequence: u64,
        problems: usize,
        dropped: usize,
        duplicates: usize,
    },
    Failed(ErrorInfo),
    AlreadyInProgress,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshStatus {
    pub phase: RefreshPhase,
    pub in_progress: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<ErrorInfo>,
    pub sequence: u64,
    pub problems: usize,
    pub snapshot_fetched_at: Option<DateTime<Utc>>,
}

struct RefreshState {
    phase: RefreshPhase,
    last_success: Option<DateTime<Utc>>,
    last_error: Option<ErrorInfo>,
}

/// Owns the refresh cycle: fetch, build, publish.
///
/// At most one cycle runs at a time. Readers of the [`SnapshotStore`] are
/// never blocked; a failed cycle leaves the published snapshot untouched.
pub struct RefreshCoordinator {
    store: Arc<SnapshotStore>,
    fetcher: Arc<dyn UpstreamFetcher>,
    retry_policy: RetryPolicy,
    fetch_timeout: Duration,
    snapshot_file: Option<SnapshotFile>,
    in_progress: AtomicBool,
    state: Mutex<RefreshState>,
}

/// Releases the in-flight flag and resets the phase, also on panic.
struct InFlightGuard<'a> {
    coordinator: &'a RefreshCoordinator,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.state().phase = RefreshPhase::Idle;
        self.coordinator.in_progress.store(false, Ordering::Release);
    }
}

impl RefreshCoordinator {
    pub fn new(
        store: Arc<SnapshotStore>,
        fetcher: Arc<dyn UpstreamFetcher>,
        retry_policy: RetryPolicy,
        fetch_timeout: Duration,
        snapshot_file: Option<SnapshotFile>,
    ) -> Self {
        Self {
            store,
            fetcher,
            retry_policy,
            fetch_timeout,
            snapshot_file,
            in_progress: AtomicBool::new(false),
            state: Mutex::new(RefreshState {
                phase: RefreshPhase::Idle,
                last_success: None,
                last_error: None,
            }),
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    fn state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: RefreshPhase) {
        self.state().phase = phase;
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { coordinator: self })
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Starts a cycle in the background.
    pub fn trigger_refresh(self: &Arc<Self>) -> TriggerOutcome {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return TriggerOutcome::AlreadyInProgress;
        }
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = InFlightGuard {
                coordinator: &coordinator,
            };
            coordinator.run_cycle().await;
        });
        TriggerOutcome::Started
    }

    /// Runs a cycle and waits for its outcome.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = self.try_begin() else {
            return RefreshOutcome::AlreadyInProgress;
        };
        self.run_cycle().await
    }

    /// Publishes `records` loaded from a local source, but only while no
    /// snapshot is current. Returns whether something was published.
    pub fn seed(&self, records: &[RawRecord], source: &str) -> Result<bool, BuildError> {
        let Some(_guard) = self.try_begin() else {
            return Ok(false);
        };
        if self.store.is_initialized() {
            return Ok(false);
        }
        let snapshot = build_snapshot(records, self.store.sequence() + 1, Utc::now())?;
        info!(
            "Seeded catalog from {} with {} problems ({} dropped, {} duplicates)",
            source,
            snapshot.len(),
            snapshot.stats().dropped,
            snapshot.stats().duplicates
        );
        metrics::update_catalog_metrics(&snapshot);
        self.store.publish(snapshot);
        Ok(true)
    }

    /// Seeds a cold store from a previously persisted snapshot file. A
    /// missing, unreadable or unusable file leaves the store cold.
    pub fn seed_from_file(&self, file: &SnapshotFile) -> bool {
        let source = file.path().display().to_string();
        match file.load() {
            Ok(Some(records)) => match self.seed(&records, &source) {
                Ok(seeded) => seeded,
                Err(err) => {
                    warn!("Ignoring snapshot file {}: {}", source, err);
                    false
                }
            },
            Ok(None) => {
                info!("No snapshot file at {} yet", source);
                false
            }
            Err(err) => {
                warn!("Failed to read snapshot file: {:#}", err);
                false
            }
        }
    }

    pub fn status(&self) -> RefreshStatus {
        let current = self.store.current();
        let state = self.state();
        RefreshStatus {
            phase: state.phase,
            in_progress: self.is_in_progress(),
            last_success: state.last_success,
            last_error: state.last_error.clone(),
            sequence: current.as_ref().map(|s| s.sequence()).unwrap_or(0),
            problems: current.as_ref().map(|s| s.len()).unwrap_or(0),
            snapshot_fetched_at: current.as_ref().map(|s| s.fetched_at()),
        }
    }

    async fn fetch_once(&self) -> Result<Vec<RawRecord>, FetchError> {
        match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch_all()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::timeout(format!(
                "catalog fetch did not complete within {:?}",
                self.fetch_timeout
            ))),
        }
    }

    async fn run_cycle(&self) -> RefreshOutcome {
        let started = Instant::now();
        self.set_phase(RefreshPhase::Fetching);
        info!("Catalog refresh started");

        let mut retry_count = 0;
        let records = loop {
            match self.fetch_once().await {
                Ok(records) => break records,
                Err(err) if self.retry_policy.should_retry(&err, retry_count) => {
                    let delay = self.retry_policy.backoff(retry_count);
                    warn!(
                        "Catalog fetch attempt {} failed, retrying in {:?}: {}",
                        retry_count + 1,
                        delay,
                        err.message
                    );
                    tokio::time::sleep(delay).await;
                    retry_count += 1;
                }
                Err(err) => {
                    return self.fail(err.kind.into(), err.message, retry_count + 1, started);
                }
            }
        };

        self.set_phase(RefreshPhase::Building);
        let sequence = self.store.sequence() + 1;
        let snapshot = match build_snapshot(&records, sequence, Utc::now()) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                return self.fail(ErrorKind::BuildFailure, err.to_string(), retry_count + 1, started)
            }
        };

        self.set_phase(RefreshPhase::Publishing);
        let outcome = self.publish(snapshot);
        metrics::record_refresh("published", started.elapsed());
        info!(
            "Catalog refresh published {:?} in {:?}",
            outcome,
            started.elapsed()
        );

        if let Some(file) = self.snapshot_file.clone() {
            let path = file.path().to_path_buf();
            match tokio::task::spawn_blocking(move || file.save(&records)).await {
                Ok(Ok(())) => debug!("Snapshot file {:?} updated", path),
                Ok(Err(err)) => error!("Failed to write snapshot file {:?}: {:#}", path, err),
                Err(err) => error!("Snapshot file writer for {:?} failed: {}", path, err),
            }
        }
        outcome
    }

    fn publish(&self, snapshot: Snapshot) -> RefreshOutcome {
        let stats = snapshot.stats();
        let outcome = RefreshOutcome::Published {
            sequence: snapshot.sequence(),
            problems: snapshot.len(),
            dropped: stats.dropped,
            duplicates: stats.duplicates,
        };
        metrics::update_catalog_metrics(&snapshot);
        self.store.publish(snapshot);

        let mut state = self.state();
        state.last_success = Some(Utc::now());
        state.last_error = None;
        outcome
    }

    fn fail(&self, kind: ErrorKind, message: String, attempts: u32, started: Instant) -> RefreshOutcome {
        error!(
            "Catalog refresh failed after {} attempt(s), keeping sequence {}: {:?} {}",
            attempts,
            self.store.sequence(),
            kind,
            message
        );
        let info = ErrorInfo {
            kind,
            message,
            attempts,
            at: Utc::now(),
        };
        self.state().last_error = Some(info.clone());
        let label = match kind {
            ErrorKind::FetchTransient => "fetch_transient",
            ErrorKind::FetchPermanent => "fetch_permanent",
            ErrorKind::BuildFailure => "build_failure",
        };
        metrics::record_refresh(label, started.elapsed());
        RefreshOutcome::Failed(info)
    }
}
