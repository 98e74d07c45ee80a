//! Progress snapshots published after every item outcome.

use serde::{Deserialize, Serialize};

/// A point-in-time view of run progress.
///
/// Derived state, recomputed on each task outcome; `completed` never
/// exceeds `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Number of items that completed successfully.
    pub completed: usize,
    /// Total number of items in the run.
    pub total: usize,
}

impl ProgressSnapshot {
    /// Creates a new snapshot, clamping `completed` to `total`.
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed: completed.min(total),
            total,
        }
    }

    /// Returns progress as a whole percentage (0-100).
    ///
    /// An empty run reports 0.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.completed as f64 / self.total as f64 * 100.0).round();
        pct as u8
    }

    /// Returns true if all items have completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}
