//! Background job scheduling and execution system.
//!
//! This module provides infrastructure for running periodic and event-triggered
//! background tasks such as the catalog refresh.

mod context;
mod handle;
mod job;
pub mod jobs;
mod scheduler;

pub use context::JobContext;
pub use handle::{JobInfo, JobRunInfo, JobScheduleInfo, SchedulerHandle};
pub use job::{BackgroundJob, HookEvent, JobError, JobSchedule};
pub use scheduler::{create_scheduler, JobScheduler};
