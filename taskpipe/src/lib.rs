//! # Taskpipe
//!
//! A bounded-concurrency, retrying task pipeline.
//!
//! Taskpipe sequences three stages over an abstract work source: fetch a
//! work list, execute each item under a concurrency cap with per-item
//! retry/backoff/timeout, then run a finalization step. Every run
//! terminates in exactly one of two states, completed or failed, and
//! reports progress and an append-only event log throughout.
//!
//! - **Bounded admission**: at most K items in flight, never exceeded
//!   even transiently; a freed slot admits the next queued item
//!   immediately
//! - **Per-item resilience**: exponential backoff between retries and a
//!   hard per-attempt deadline; timed-out operations are abandoned, not
//!   force-cancelled
//! - **Fail-fast runs**: the first item to exhaust its retries fails the
//!   run promptly without corrupting in-flight accounting
//! - **Observability**: status labels, progress snapshots, log entries,
//!   and a single terminal outcome per run via an observer seam
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use taskpipe::prelude::*;
//! use std::sync::Arc;
//!
//! let source = Arc::new(SimWorkSource::new());
//! let runner = PipelineRunner::new(source)
//!     .with_config(PipelineConfig::new().with_concurrency_limit(3))
//!     .with_observer(Arc::new(TracingObserver));
//!
//! runner.run().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod backoff;
pub mod config;
pub mod core;
pub mod errors;
pub mod executor;
pub mod observability;
pub mod observer;
pub mod runner;
pub mod scheduler;
pub mod sim;
pub mod source;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backoff::BackoffPolicy;
    pub use crate::config::PipelineConfig;
    pub use crate::core::{
        AttemptOutcome, AttemptRecord, EventLog, LogEntry, ProgressSnapshot, RunState,
    };
    pub use crate::errors::PipelineError;
    pub use crate::executor::RetryingExecutor;
    pub use crate::observer::{
        CollectingObserver, NoOpObserver, PipelineObserver, RunOutcome, TracingObserver,
    };
    pub use crate::runner::PipelineRunner;
    pub use crate::scheduler::BoundedScheduler;
    pub use crate::sim::SimWorkSource;
    pub use crate::source::WorkSource;
    pub use crate::utils::{generate_run_id, iso_timestamp, Timestamp};
}
