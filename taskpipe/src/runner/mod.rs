//! Pipeline runner: stage sequencing and the run state machine.

mod pipeline_runner;

#[cfg(test)]
mod integration_tests;

pub use pipeline_runner::PipelineRunner;
