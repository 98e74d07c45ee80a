//! Bounded-admission scheduler driving work items through the executor.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::ProgressSnapshot;
use crate::errors::PipelineError;
use crate::executor::RetryingExecutor;

/// Drives a FIFO queue of work items with at most K concurrently in
/// flight.
///
/// Items start in queue order; completion order is governed by each
/// item's actual latency. Whenever a slot frees and no fatal failure has
/// been recorded, the next queued item is admitted in the same scheduling
/// step, so the in-flight count stays at `min(K, remaining)` and never
/// exceeds K, even transiently.
pub struct BoundedScheduler {
    executor: Arc<RetryingExecutor>,
    concurrency_limit: usize,
}

impl BoundedScheduler {
    /// Creates a scheduler over the given executor.
    ///
    /// A limit of 0 is treated as 1.
    #[must_use]
    pub fn new(executor: Arc<RetryingExecutor>, concurrency_limit: usize) -> Self {
        Self {
            executor,
            concurrency_limit: concurrency_limit.max(1),
        }
    }

    /// Runs all items to completion or to the first definitive failure.
    ///
    /// `on_progress` fires after every successful item outcome with the
    /// updated counts. On the first fatal error the scheduler stops
    /// admitting queued items and returns immediately; already-active
    /// items keep running detached to their natural completion and their
    /// results are ignored.
    pub async fn run<F>(&self, items: Vec<String>, mut on_progress: F) -> Result<(), PipelineError>
    where
        F: FnMut(ProgressSnapshot) + Send,
    {
        let total = items.len();
        let mut queue: VecDeque<String> = items.into();
        let mut in_flight: FuturesUnordered<JoinHandle<Result<String, PipelineError>>> =
            FuturesUnordered::new();
        let mut completed = 0usize;

        while in_flight.len() < self.concurrency_limit {
            let Some(item) = queue.pop_front() else { break };
            in_flight.push(self.spawn_item(item));
        }

        while let Some(joined) = in_flight.next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(join_err) => Err(PipelineError::Operation(join_err.to_string())),
            };

            match outcome {
                Ok(_value) => {
                    completed += 1;
                    on_progress(ProgressSnapshot::new(completed, total));

                    // Admit the next queued item in the same step to keep
                    // the pool saturated without exceeding the cap.
                    if let Some(next) = queue.pop_front() {
                        in_flight.push(self.spawn_item(next));
                    }
                }
                Err(err) => {
                    debug!(
                        error = %err,
                        queued = queue.len(),
                        active = in_flight.len(),
                        "Fatal item failure, halting admission"
                    );
                    // Dropping the remaining handles detaches in-flight
                    // items rather than aborting them.
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    fn spawn_item(&self, item: String) -> JoinHandle<Result<String, PipelineError>> {
        let executor = Arc::clone(&self.executor);
        tokio::spawn(async move { executor.execute(&item).await })
    }
}

impl std::fmt::Debug for BoundedScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedScheduler")
            .field("concurrency_limit", &self.concurrency_limit)
            .finish()
    }
}
