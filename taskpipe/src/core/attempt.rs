//! Attempt records for per-attempt observability.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::iso_timestamp;

/// The outcome of a single execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The attempt produced a value.
    Success,
    /// The attempt exceeded its per-attempt deadline.
    Timeout,
    /// The underlying operation failed.
    Error,
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Timeout => write!(f, "timeout"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A record of one execution attempt of one work item.
///
/// Records are created inside the retrying executor, never mutated after
/// creation, and appended to the event log's attempt trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// The work item this attempt belongs to.
    pub item: String,
    /// The attempt number, starting at 1.
    pub attempt: u32,
    /// The attempt outcome.
    pub outcome: AttemptOutcome,
    /// Error detail when the outcome is not `Success`.
    pub error: Option<String>,
    /// When the record was created (ISO 8601).
    pub timestamp: String,
}

impl AttemptRecord {
    /// Creates a success record.
    #[must_use]
    pub fn success(item: impl Into<String>, attempt: u32) -> Self {
        Self {
            item: item.into(),
            attempt,
            outcome: AttemptOutcome::Success,
            error: None,
            timestamp: iso_timestamp(),
        }
    }

    /// Creates a timeout record.
    #[must_use]
    pub fn timeout(item: impl Into<String>, attempt: u32, error: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            attempt,
            outcome: AttemptOutcome::Timeout,
            error: Some(error.into()),
            timestamp: iso_timestamp(),
        }
    }

    /// Creates an error record.
    #[must_use]
    pub fn error(item: impl Into<String>, attempt: u32, error: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            attempt,
            outcome: AttemptOutcome::Error,
            error: Some(error.into()),
            timestamp: iso_timestamp(),
        }
    }

    /// Returns true if the attempt succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }
}
