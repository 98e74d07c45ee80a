//! Error types for the taskpipe pipeline.
//!
//! Attempt-level errors (`Timeout`, `Operation`) are retried inside the
//! executor and never escape it; only a `DefinitiveFailure` propagates to
//! the scheduler, which treats it as fatal for the whole run. Stage-level
//! errors (`Fetch`, `Finalize`) are never retried.

use thiserror::Error;

/// The main error type for taskpipe operations.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// An attempt exceeded its per-attempt deadline.
    #[error("operation timed out")]
    Timeout,

    /// The underlying work item operation failed.
    #[error("operation failed: {0}")]
    Operation(String),

    /// Retries exhausted for a work item; wraps the last attempt's error.
    #[error("failed to process '{item}' definitively after {attempts} attempts: {source}")]
    DefinitiveFailure {
        /// The work item that exhausted its retries.
        item: String,
        /// Total attempts made (initial attempt included).
        attempts: u32,
        /// The last attempt's error.
        #[source]
        source: Box<PipelineError>,
    },

    /// Fetching the work list failed.
    #[error("failed to fetch work list: {0}")]
    Fetch(String),

    /// The finalization step failed.
    #[error("finalization failed: {0}")]
    Finalize(String),

    /// A run was requested while another run is still in progress.
    #[error("a run is already in progress")]
    AlreadyRunning,
}

impl PipelineError {
    /// Creates a definitive failure wrapping the last attempt's error.
    #[must_use]
    pub fn definitive(item: impl Into<String>, attempts: u32, last: Self) -> Self {
        Self::DefinitiveFailure {
            item: item.into(),
            attempts,
            source: Box::new(last),
        }
    }

    /// Returns true if this error is fatal for the whole run.
    ///
    /// Attempt-level errors are retried locally and are not fatal on
    /// their own.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DefinitiveFailure { .. } | Self::Fetch(_) | Self::Finalize(_)
        )
    }

    /// Returns true if this error represents a timed-out attempt.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
