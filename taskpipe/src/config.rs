//! Pipeline configuration.

use std::time::Duration;

use crate::backoff::BackoffPolicy;

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum number of work items in flight at once.
    pub concurrency_limit: usize,
    /// Retries per item after the initial attempt; 0 means exactly one
    /// attempt.
    pub max_retries: u32,
    /// Backoff delay before the first retry; doubles per retry.
    pub initial_backoff: Duration,
    /// Hard deadline for a single attempt.
    pub per_attempt_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 3,
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            per_attempt_timeout: Duration::from_secs(5),
        }
    }
}

impl PipelineConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the concurrency limit (clamped to at least 1).
    #[must_use]
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    /// Sets the retry budget per item.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the initial backoff delay.
    #[must_use]
    pub fn with_initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn with_per_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.per_attempt_timeout = timeout;
        self
    }

    /// Returns the backoff policy derived from this config.
    #[must_use]
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(self.initial_backoff)
    }
}
