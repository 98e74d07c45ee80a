//! Run state enum and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of one pipeline run.
///
/// Transitions are monotonic within a run; the only way back is a fresh
/// start request, which discards the prior run's log and counters and
/// re-enters at `FetchingList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// No run has started yet, or the runner is between runs.
    Idle,
    /// The work list is being fetched.
    FetchingList,
    /// Work items are being executed under the concurrency cap.
    Executing,
    /// All items succeeded; the finalization step is running.
    Finalizing,
    /// The run finished successfully.
    Completed,
    /// The run failed fatally.
    Failed,
}

impl Default for RunState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::FetchingList => write!(f, "fetching_list"),
            Self::Executing => write!(f, "executing"),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl RunState {
    /// Returns true if the state is terminal for a run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if a transition from `self` to `next` is legal.
    ///
    /// Any non-terminal state may fail; terminal states only re-enter at
    /// `FetchingList` (a fresh run), as does `Idle`.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        match (self, next) {
            (Self::Idle | Self::Completed | Self::Failed, Self::FetchingList)
            | (Self::FetchingList, Self::Executing)
            | (Self::Executing, Self::Finalizing)
            | (Self::Finalizing, Self::Completed) => true,
            (from, Self::Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}
