//! The pipeline runner implementation.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::core::{EventLog, ProgressSnapshot, RunState};
use crate::errors::PipelineError;
use crate::executor::RetryingExecutor;
use crate::observer::{NoOpObserver, PipelineObserver, RunOutcome};
use crate::scheduler::BoundedScheduler;
use crate::source::WorkSource;
use crate::utils::generate_run_id;

/// Sequences the three pipeline stages and owns the run's state machine,
/// status label, progress, and log stream.
///
/// A runner instance is independent: multiple runners may run
/// concurrently with no shared state. Starting a new run after a terminal
/// state discards the prior run's log, attempt trace, and progress.
pub struct PipelineRunner {
    config: PipelineConfig,
    source: Arc<dyn WorkSource>,
    observer: Arc<dyn PipelineObserver>,
    log: Arc<EventLog>,
    state: RwLock<RunState>,
    status: RwLock<String>,
    progress: RwLock<ProgressSnapshot>,
    run_id: RwLock<Option<Uuid>>,
}

impl PipelineRunner {
    /// Creates a runner over a work source with default config and a
    /// no-op observer.
    #[must_use]
    pub fn new(source: Arc<dyn WorkSource>) -> Self {
        let runner = Self {
            config: PipelineConfig::default(),
            source,
            observer: Arc::new(NoOpObserver),
            log: Arc::new(EventLog::new()),
            state: RwLock::new(RunState::Idle),
            status: RwLock::new("Idle".to_string()),
            progress: RwLock::new(ProgressSnapshot::default()),
            run_id: RwLock::new(None),
        };
        runner.register_log_listener();
        runner
    }

    /// Sets the pipeline configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the observer. Log entries appended from this point on are
    /// forwarded to it.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        // Fresh log so the new observer is the only log listener.
        self.log = Arc::new(EventLog::new());
        self.register_log_listener();
        self
    }

    fn register_log_listener(&self) {
        let observer = Arc::clone(&self.observer);
        self.log.add_listener(move |entry| observer.on_log(entry));
    }

    /// Runs the pipeline to its terminal state.
    ///
    /// Exactly one terminal outcome is reported per run. Returns
    /// `AlreadyRunning` if a run is still in progress on this instance.
    pub async fn run(&self) -> Result<(), PipelineError> {
        {
            let mut state = self.state.write();
            if *state != RunState::Idle && !state.is_terminal() {
                return Err(PipelineError::AlreadyRunning);
            }
            *state = RunState::FetchingList;
        }

        // Fresh run: discard the prior run's artifacts.
        self.log.reset();
        *self.progress.write() = ProgressSnapshot::default();
        *self.run_id.write() = Some(generate_run_id());
        self.set_status("Fetching work list...");

        self.log.append("Starting task processing...");

        match self.run_stages().await {
            Ok(()) => {
                self.enter(RunState::Completed, "Completed");
                self.log.append("Task processing finished successfully.");
                self.observer.on_terminal(&RunOutcome::Completed);
                Ok(())
            }
            Err(err) => {
                self.enter(RunState::Failed, "Failed");
                self.log.append(format!("Error during processing: {err}"));
                self.observer.on_terminal(&RunOutcome::Failed(err.clone()));
                Err(err)
            }
        }
    }

    async fn run_stages(&self) -> Result<(), PipelineError> {
        self.log.append("Fetching work list...");
        let items = self
            .source
            .fetch_work_list()
            .await
            .map_err(|err| PipelineError::Fetch(err.to_string()))?;
        let total = items.len();
        self.log.append(format!("Work list fetched. Found {total} items."));

        self.enter(RunState::Executing, format!("Executing (0/{total})..."));
        let executor = Arc::new(RetryingExecutor::new(
            Arc::clone(&self.source),
            Arc::clone(&self.log),
            &self.config,
        ));
        let scheduler = BoundedScheduler::new(executor, self.config.concurrency_limit);
        scheduler
            .run(items, |snapshot| {
                *self.progress.write() = snapshot;
                self.observer.on_progress(snapshot);
                self.set_status(format!(
                    "Executing ({}/{})...",
                    snapshot.completed, snapshot.total
                ));
            })
            .await
            .map_err(|err| {
                self.log.append(format!("FATAL: {err}"));
                err
            })?;
        self.log.append("All items processed successfully.");

        self.enter(RunState::Finalizing, "Finalizing...");
        self.log.append("Finalizing...");
        self.source
            .finalize()
            .await
            .map_err(|err| PipelineError::Finalize(err.to_string()))?;
        self.log.append("Finalization complete.");

        Ok(())
    }

    fn enter(&self, next: RunState, label: impl Into<String>) {
        {
            let mut state = self.state.write();
            if !state.can_transition_to(next) {
                warn!(from = %*state, to = %next, "Ignoring illegal state transition");
                return;
            }
            *state = next;
        }
        debug!(state = %next, "Run state changed");
        self.set_status(label);
    }

    fn set_status(&self, label: impl Into<String>) {
        let label = label.into();
        *self.status.write() = label.clone();
        self.observer.on_status(&label);
    }

    /// Returns the current run state.
    #[must_use]
    pub fn state(&self) -> RunState {
        *self.state.read()
    }

    /// Returns the current human-readable status label.
    #[must_use]
    pub fn status(&self) -> String {
        self.status.read().clone()
    }

    /// Returns the latest progress snapshot.
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        *self.progress.read()
    }

    /// Returns the event log shared with this runner.
    #[must_use]
    pub fn log(&self) -> Arc<EventLog> {
        Arc::clone(&self.log)
    }

    /// Returns the identifier of the current (or most recent) run.
    #[must_use]
    pub fn run_id(&self) -> Option<Uuid> {
        *self.run_id.read()
    }
}

impl std::fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("state", &self.state())
            .field("status", &self.status())
            .field("progress", &self.progress())
            .finish()
    }
}
