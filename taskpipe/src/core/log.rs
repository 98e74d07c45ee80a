//! The append-only event log for one pipeline run.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::attempt::AttemptRecord;
use crate::utils::iso_timestamp;

/// A listener invoked for every appended log entry.
pub type LogListener = Arc<dyn Fn(&LogEntry) + Send + Sync>;

/// One entry in the run log.
///
/// Entries are ordered by insertion and never reordered or removed
/// within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonically increasing sequence number within a run.
    pub seq: u64,
    /// When the entry was appended (ISO 8601).
    pub timestamp: String,
    /// Human-readable message.
    pub message: String,
}

/// The append-only log and attempt trace for a run.
///
/// Owned by one runner instance; `reset()` discards the prior run's
/// entries and restarts the sequence counter. Registered listeners are
/// invoked synchronously after each append, outside the entries lock.
#[derive(Default)]
pub struct EventLog {
    entries: RwLock<Vec<LogEntry>>,
    attempts: RwLock<Vec<AttemptRecord>>,
    next_seq: AtomicU64,
    listeners: RwLock<Vec<LogListener>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns the created entry.
    pub fn append(&self, message: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            timestamp: iso_timestamp(),
            message: message.into(),
        };
        self.entries.write().push(entry.clone());

        let listeners = self.listeners.read();
        for listener in listeners.iter() {
            listener(&entry);
        }

        entry
    }

    /// Records one execution attempt in the attempt trace.
    pub fn record_attempt(&self, record: AttemptRecord) {
        self.attempts.write().push(record);
    }

    /// Registers a listener notified for every appended entry.
    pub fn add_listener<F>(&self, listener: F)
    where
        F: Fn(&LogEntry) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Returns a copy of all log entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    /// Returns a copy of the attempt trace.
    #[must_use]
    pub fn attempts(&self) -> Vec<AttemptRecord> {
        self.attempts.read().clone()
    }

    /// Returns the number of log entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Discards all entries and attempts and restarts the sequence
    /// counter. Listeners are kept.
    pub fn reset(&self) {
        self.entries.write().clear();
        self.attempts.write().clear();
        self.next_seq.store(0, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("entries", &self.len())
            .field("attempts", &self.attempts.read().len())
            .finish()
    }
}
