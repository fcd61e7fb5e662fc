use crate::refresh::RefreshCoordinator;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Context provided to jobs during execution.
///
/// Contains references to shared resources and a cancellation token
/// for graceful shutdown handling.
#[derive(Clone)]
pub struct JobContext {
    /// Token to check for cancellation/shutdown requests.
    pub cancellation_token: CancellationToken,

    /// Drives catalog refresh cycles.
    pub coordinator: Arc<RefreshCoordinator>,

    /// Runtime the scheduler lives on, for jobs that need to await.
    pub runtime: Handle,
}

impl JobContext {
    pub fn new(
        cancellation_token: CancellationToken,
        coordinator: Arc<RefreshCoordinator>,
        runtime: Handle,
    ) -> Self {
        Self {
            cancellation_token,
            coordinator,
            runtime,
        }
    }

    /// Same resources, different cancellation token.
    pub fn with_token(&self, cancellation_token: CancellationToken) -> Self {
        Self {
            cancellation_token,
            coordinator: Arc::clone(&self.coordinator),
            runtime: self.runtime.clone(),
        }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}
