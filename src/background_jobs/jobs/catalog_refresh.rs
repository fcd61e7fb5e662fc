//! Periodic catalog refresh.
//!
//! Runs once on startup and then every configured interval, driving one
//! fetch/build/publish cycle through the [`RefreshCoordinator`].
//!
//! [`RefreshCoordinator`]: crate::refresh::RefreshCoordinator

use crate::background_jobs::{
    context::JobContext,
    job::{BackgroundJob, HookEvent, JobError, JobSchedule},
};
use crate::config::RefreshSettings;
use crate::refresh::RefreshOutcome;
use std::time::Duration;
use tracing::{debug, info};

pub struct CatalogRefreshJob {
    interval: Duration,
}

impl CatalogRefreshJob {
    pub fn from_settings(settings: &RefreshSettings) -> Self {
        Self {
            interval: Duration::from_secs(settings.interval_secs),
        }
    }
}

impl BackgroundJob for CatalogRefreshJob {
    fn id(&self) -> &'static str {
        "catalog_refresh"
    }

    fn name(&self) -> &'static str {
        "Catalog Refresh"
    }

    fn description(&self) -> &'static str {
        "Fetch the problem list from upstream and publish a new catalog snapshot"
    }

    fn schedule(&self) -> JobSchedule {
        JobSchedule::Combined {
            interval: Some(self.interval),
            hooks: vec![HookEvent::OnStartup],
        }
    }

    fn execute(&self, ctx: &JobContext) -> Result<(), JobError> {
        if ctx.is_cancelled() {
            return Err(JobError::Cancelled);
        }

        match ctx.runtime.block_on(ctx.coordinator.refresh()) {
            RefreshOutcome::Published {
                sequence,
                problems,
                ..
            } => {
                info!(
                    "Catalog refresh job published sequence {} ({} problems)",
                    sequence, problems
                );
                Ok(())
            }
            RefreshOutcome::AlreadyInProgress => {
                debug!("Catalog refresh already in progress, skipping");
                Ok(())
            }
            RefreshOutcome::Failed(error) => Err(JobError::ExecutionFailed(format!(
                "{:?} after {} attempt(s): {}",
                error.kind, error.attempts, error.message
            ))),
        }
    }
}
