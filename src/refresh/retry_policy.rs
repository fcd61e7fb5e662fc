//! Retry policy for failed catalog fetches.
//!
//! Implements exponential backoff with configurable parameters.

use crate::config::RefreshSettings;
use crate::upstream::FetchError;
use std::time::Duration;

/// Retry policy implementing exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first failed one.
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds (cap for exponential growth).
    pub max_backoff_ms: u64,
    /// Multiplier applied to backoff after each retry.
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    pub fn new(config: &RefreshSettings) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff_ms: config.initial_backoff_ms,
            max_backoff_ms: config.max_backoff_ms,
            backoff_multiplier: config.backoff_multiplier,
        }
    }

    /// Check if an error should be retried given the number of retries
    /// already performed.
    pub fn should_retry(&self, error: &FetchError, retry_count: u32) -> bool {
        error.is_retryable() && retry_count < self.max_retries
    }

    /// `initial_backoff * multiplier^retry_count`, capped at `max_backoff_ms`.
    pub fn backoff_ms(&self, retry_count: u32) -> u64 {
        let exponent = i32::try_from(retry_count).unwrap_or(i32::MAX);
        let backoff = self.initial_backoff_ms as f64 * self.backoff_multiplier.powi(exponent);
        backoff.min(self.max_backoff_ms as f64) as u64
    }

    pub fn backoff(&self, retry_count: u32) -> Duration {
        Duration::from_millis(self.backoff_ms(retry_count))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RefreshSettings::default())
    }
}
