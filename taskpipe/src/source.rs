//! The abstract collaborator contract the pipeline drives.

use async_trait::async_trait;

/// The three externally-supplied operations a pipeline run sequences.
///
/// Implementations own their latency and failure behavior; the core only
/// assumes that `execute_work_item` may take arbitrarily long (bounded
/// for the pipeline's purposes by the configured per-attempt timeout) and
/// may fail nondeterministically. Errors cross this boundary as
/// `anyhow::Error`; the pipeline maps them into its own taxonomy.
#[async_trait]
pub trait WorkSource: Send + Sync {
    /// Produces the ordered list of work item identifiers for the run.
    async fn fetch_work_list(&self) -> anyhow::Result<Vec<String>>;

    /// Executes one work item, returning a human-readable result value.
    async fn execute_work_item(&self, item: &str) -> anyhow::Result<String>;

    /// Runs the finalization step after all items have succeeded.
    async fn finalize(&self) -> anyhow::Result<()>;
}
