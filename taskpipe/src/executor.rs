//! Retrying executor: timeout + retry + backoff for one work item.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::backoff::BackoffPolicy;
use crate::config::PipelineConfig;
use crate::core::{AttemptRecord, EventLog};
use crate::errors::PipelineError;
use crate::source::WorkSource;

/// Executes a single work item with per-attempt timeout, retry, and
/// exponential backoff.
///
/// Each attempt races the underlying operation against the configured
/// deadline. The operation runs as a detached task: a timeout stops the
/// executor from waiting on it but never force-cancels it, and a late
/// result from an abandoned attempt is discarded rather than folded into
/// the item's outcome.
pub struct RetryingExecutor {
    source: Arc<dyn WorkSource>,
    log: Arc<EventLog>,
    backoff: BackoffPolicy,
    max_retries: u32,
    per_attempt_timeout: Duration,
}

impl RetryingExecutor {
    /// Creates an executor bound to a work source and event log.
    #[must_use]
    pub fn new(source: Arc<dyn WorkSource>, log: Arc<EventLog>, config: &PipelineConfig) -> Self {
        Self {
            source,
            log,
            backoff: config.backoff_policy(),
            max_retries: config.max_retries,
            per_attempt_timeout: config.per_attempt_timeout,
        }
    }

    /// Runs the item until it succeeds or its retry budget is exhausted.
    ///
    /// Failures are local to this item; on exhaustion the last attempt's
    /// error is wrapped in a `DefinitiveFailure` carrying the attempt
    /// count.
    pub async fn execute(&self, item: &str) -> Result<String, PipelineError> {
        let mut attempts: u32 = 0;

        loop {
            self.log
                .append(format!("Attempt {} to process {item}...", attempts + 1));

            match self.run_attempt(item).await {
                Ok(value) => {
                    self.log
                        .record_attempt(AttemptRecord::success(item, attempts + 1));
                    self.log.append(format!("Success: {value}"));
                    return Ok(value);
                }
                Err(err) => {
                    attempts += 1;
                    let record = if err.is_timeout() {
                        AttemptRecord::timeout(item, attempts, err.to_string())
                    } else {
                        AttemptRecord::error(item, attempts, err.to_string())
                    };
                    self.log.record_attempt(record);
                    self.log
                        .append(format!("Error processing {item} (attempt {attempts}): {err}"));

                    if attempts > self.max_retries {
                        self.log.append(format!(
                            "Failed to process {item} after {} attempts.",
                            self.max_retries + 1
                        ));
                        return Err(PipelineError::definitive(item, attempts, err));
                    }

                    let delay = self.backoff.delay(attempts);
                    debug!(
                        item = %item,
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying after error"
                    );
                    self.log
                        .append(format!("Retrying {item} in {}ms...", delay.as_millis()));
                    sleep(delay).await;
                }
            }
        }
    }

    /// Runs one attempt against the per-attempt deadline.
    ///
    /// The operation is spawned so that dropping its handle on timeout
    /// detaches it instead of aborting it.
    async fn run_attempt(&self, item: &str) -> Result<String, PipelineError> {
        let source = Arc::clone(&self.source);
        let owned = item.to_string();
        let handle = tokio::spawn(async move { source.execute_work_item(&owned).await });

        match timeout(self.per_attempt_timeout, handle).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(err))) => Err(PipelineError::Operation(err.to_string())),
            Ok(Err(join_err)) => Err(PipelineError::Operation(join_err.to_string())),
            Err(_elapsed) => Err(PipelineError::Timeout),
        }
    }
}

impl std::fmt::Debug for RetryingExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingExecutor")
            .field("max_retries", &self.max_retries)
            .field("per_attempt_timeout", &self.per_attempt_timeout)
            .finish()
    }
}
