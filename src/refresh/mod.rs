//! Keeps the published catalog snapshot fresh.

mod coordinator;
mod retry_policy;

pub use coordinator::{
    ErrorInfo, ErrorKind, RefreshCoordinator, RefreshOutcome, RefreshPhase, RefreshStatus,
    TriggerOutcome,
};
pub use retry_policy::RetryPolicy;
