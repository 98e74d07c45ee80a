//! Core domain model types for taskpipe.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - Run state enum with transition rules
//! - Attempt records and outcomes
//! - Progress snapshots
//! - The append-only event log

mod attempt;
mod log;
mod progress;
mod state;

pub use attempt::{AttemptOutcome, AttemptRecord};
pub use log::{EventLog, LogEntry};
pub use progress::ProgressSnapshot;
pub use state::RunState;
