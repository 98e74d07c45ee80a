//! Observer trait and implementations.
//!
//! Observers are the pipeline's only outward-facing seam: status labels,
//! progress updates, log entries, and the single terminal outcome per run
//! all flow through a [`PipelineObserver`].

use parking_lot::RwLock;
use tracing::info;

use crate::core::{LogEntry, ProgressSnapshot};
use crate::errors::PipelineError;

/// The terminal outcome of one run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// All stages finished successfully.
    Completed,
    /// The run failed fatally with the triggering error.
    Failed(PipelineError),
}

impl RunOutcome {
    /// Returns true if the run completed successfully.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns the failure error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            Self::Completed => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// Trait for consumers of pipeline observability output.
///
/// All methods default to no-ops so implementations only override what
/// they care about. Callbacks are invoked synchronously from the run's
/// cooperative control flow and must not block.
pub trait PipelineObserver: Send + Sync {
    /// Called when the human-readable status label changes.
    fn on_status(&self, _label: &str) {}

    /// Called after every successful item outcome.
    fn on_progress(&self, _progress: ProgressSnapshot) {}

    /// Called for every appended log entry.
    fn on_log(&self, _entry: &LogEntry) {}

    /// Called exactly once per run with the terminal outcome.
    fn on_terminal(&self, _outcome: &RunOutcome) {}
}

/// An observer that discards all output.
///
/// Used as the default when no observer is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl PipelineObserver for NoOpObserver {}

/// An observer that forwards output to the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_status(&self, label: &str) {
        info!(status = %label, "Status changed");
    }

    fn on_progress(&self, progress: ProgressSnapshot) {
        info!(
            completed = progress.completed,
            total = progress.total,
            percent = progress.percent(),
            "Progress"
        );
    }

    fn on_log(&self, entry: &LogEntry) {
        info!(seq = entry.seq, "{}", entry.message);
    }

    fn on_terminal(&self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Completed => info!("Run completed"),
            RunOutcome::Failed(err) => info!(error = %err, "Run failed"),
        }
    }
}

/// A collecting observer for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    statuses: RwLock<Vec<String>>,
    progress: RwLock<Vec<ProgressSnapshot>>,
    logs: RwLock<Vec<LogEntry>>,
    terminals: RwLock<Vec<RunOutcome>>,
}

impl CollectingObserver {
    /// Creates a new collecting observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all observed status labels.
    #[must_use]
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.read().clone()
    }

    /// Returns all observed progress snapshots.
    #[must_use]
    pub fn progress(&self) -> Vec<ProgressSnapshot> {
        self.progress.read().clone()
    }

    /// Returns all observed log entries.
    #[must_use]
    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.read().clone()
    }

    /// Returns all observed terminal outcomes.
    #[must_use]
    pub fn terminals(&self) -> Vec<RunOutcome> {
        self.terminals.read().clone()
    }

    /// Clears everything collected so far.
    pub fn clear(&self) {
        self.statuses.write().clear();
        self.progress.write().clear();
        self.logs.write().clear();
        self.terminals.write().clear();
    }
}

impl PipelineObserver for CollectingObserver {
    fn on_status(&self, label: &str) {
        self.statuses.write().push(label.to_string());
    }

    fn on_progress(&self, progress: ProgressSnapshot) {
        self.progress.write().push(progress);
    }

    fn on_log(&self, entry: &LogEntry) {
        self.logs.write().push(entry.clone());
    }

    fn on_terminal(&self, outcome: &RunOutcome) {
        self.terminals.write().push(outcome.clone());
    }
}
