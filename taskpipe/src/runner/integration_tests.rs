//! End-to-end runner scenarios.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::time::sleep;

use crate::config::PipelineConfig;
use crate::core::{AttemptOutcome, RunState};
use crate::errors::PipelineError;
use crate::observer::{CollectingObserver, RunOutcome};
use crate::runner::PipelineRunner;
use crate::source::WorkSource;

/// A fully scripted work source for end-to-end scenarios.
struct ScriptedSource {
    items: Vec<String>,
    fetch_fails_once: AtomicBool,
    fetch_delay: Duration,
    item_delay: Duration,
    fail_items: Vec<String>,
    finalize_fails: AtomicBool,
    executions: AtomicUsize,
}

impl ScriptedSource {
    fn succeeding(count: usize) -> Self {
        Self {
            items: (1..=count).map(|i| format!("file_{i}.data")).collect(),
            fetch_fails_once: AtomicBool::new(false),
            fetch_delay: Duration::ZERO,
            item_delay: Duration::from_millis(2),
            fail_items: Vec::new(),
            finalize_fails: AtomicBool::new(false),
            executions: AtomicUsize::new(0),
        }
    }

    fn failing_fetch_once(self) -> Self {
        self.fetch_fails_once.store(true, Ordering::SeqCst);
        self
    }

    fn failing_on(mut self, items: &[&str]) -> Self {
        self.fail_items = items.iter().map(|s| (*s).to_string()).collect();
        self
    }

    fn failing_finalize(self) -> Self {
        self.finalize_fails.store(true, Ordering::SeqCst);
        self
    }

    fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkSource for ScriptedSource {
    async fn fetch_work_list(&self) -> anyhow::Result<Vec<String>> {
        sleep(self.fetch_delay).await;
        if self.fetch_fails_once.swap(false, Ordering::SeqCst) {
            anyhow::bail!("work list unavailable");
        }
        Ok(self.items.clone())
    }

    async fn execute_work_item(&self, item: &str) -> anyhow::Result<String> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        sleep(self.item_delay).await;
        if self.fail_items.iter().any(|f| f == item) {
            anyhow::bail!("Failed to load {item}");
        }
        Ok(format!("Successfully loaded {item}"))
    }

    async fn finalize(&self) -> anyhow::Result<()> {
        if self.finalize_fails.load(Ordering::SeqCst) {
            anyhow::bail!("finalization refused");
        }
        Ok(())
    }
}

fn fast_config() -> PipelineConfig {
    PipelineConfig::new()
        .with_initial_backoff(Duration::from_millis(1))
        .with_per_attempt_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_happy_path_five_items() {
    let source = Arc::new(ScriptedSource::succeeding(5));
    let observer = Arc::new(CollectingObserver::new());
    let runner = PipelineRunner::new(source)
        .with_config(fast_config().with_concurrency_limit(2))
        .with_observer(Arc::clone(&observer) as Arc<dyn crate::observer::PipelineObserver>);

    runner.run().await.unwrap();

    assert_eq!(runner.state(), RunState::Completed);
    assert_eq!(runner.status(), "Completed");
    assert!(runner.progress().is_complete());

    // Exactly one progress call per item, counting 1..=5 of 5.
    let counts: Vec<usize> = observer.progress().iter().map(|p| p.completed).collect();
    assert_eq!(counts, vec![1, 2, 3, 4, 5]);
    assert!(observer.progress().iter().all(|p| p.total == 5));

    // Exactly one terminal callback, and it reports completion.
    let terminals = observer.terminals();
    assert_eq!(terminals.len(), 1);
    assert!(terminals[0].is_completed());

    // Status labels walk the stage sequence in order.
    let statuses = observer.statuses();
    assert_eq!(statuses.first().map(String::as_str), Some("Fetching work list..."));
    assert!(statuses.contains(&"Executing (0/5)...".to_string()));
    assert!(statuses.contains(&"Finalizing...".to_string()));
    assert_eq!(statuses.last().map(String::as_str), Some("Completed"));
}

#[tokio::test]
async fn test_item_exhausting_retries_fails_the_run() {
    // One item that always times out: 100ms deadline against a 10s
    // operation, two retries with 10ms initial backoff.
    let source = Arc::new(
        ScriptedSource::succeeding(1).with_item_delay(Duration::from_secs(10)),
    );
    let observer = Arc::new(CollectingObserver::new());
    let runner = PipelineRunner::new(source)
        .with_config(
            PipelineConfig::new()
                .with_max_retries(2)
                .with_per_attempt_timeout(Duration::from_millis(100))
                .with_initial_backoff(Duration::from_millis(10)),
        )
        .with_observer(Arc::clone(&observer) as Arc<dyn crate::observer::PipelineObserver>);

    let err = runner.run().await.unwrap_err();

    assert_eq!(runner.state(), RunState::Failed);
    match &err {
        PipelineError::DefinitiveFailure { attempts, source, .. } => {
            assert_eq!(*attempts, 3);
            assert!(source.is_timeout());
        }
        other => panic!("expected DefinitiveFailure, got {other:?}"),
    }

    // Exactly maxRetries + 1 attempts, all timeouts.
    let attempts = runner.log().attempts();
    assert_eq!(attempts.len(), 3);
    assert!(attempts.iter().all(|a| a.outcome == AttemptOutcome::Timeout));

    // One terminal callback carrying the failure.
    let terminals = observer.terminals();
    assert_eq!(terminals.len(), 1);
    assert!(matches!(
        terminals[0],
        RunOutcome::Failed(PipelineError::DefinitiveFailure { .. })
    ));

    // The triggering error message reaches the final log entry.
    let last = runner.log().entries().last().cloned().unwrap();
    assert!(last.message.contains("definitively"));
}

#[tokio::test]
async fn test_fetch_failure_short_circuits() {
    let source = Arc::new(ScriptedSource::succeeding(3).failing_fetch_once());
    let observer = Arc::new(CollectingObserver::new());
    let runner = PipelineRunner::new(Arc::clone(&source) as Arc<dyn WorkSource>)
        .with_config(fast_config())
        .with_observer(Arc::clone(&observer) as Arc<dyn crate::observer::PipelineObserver>);

    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, PipelineError::Fetch(_)));
    assert_eq!(runner.state(), RunState::Failed);
    // No items were ever attempted.
    assert!(runner.log().attempts().is_empty());
    assert_eq!(source.executions(), 0);

    // The run went Idle -> FetchingList -> Failed: no Executing status.
    assert!(!observer
        .statuses()
        .iter()
        .any(|s| s.starts_with("Executing")));
}

#[tokio::test]
async fn test_finalize_failure_fails_the_run() {
    let source = Arc::new(ScriptedSource::succeeding(2).failing_finalize());
    let runner = PipelineRunner::new(source).with_config(fast_config());

    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, PipelineError::Finalize(_)));
    assert_eq!(runner.state(), RunState::Failed);
    // All items completed before finalization failed.
    assert!(runner.progress().is_complete());
}

#[tokio::test]
async fn test_rerun_after_failure_resets_artifacts() {
    // First run fails at fetch; second run succeeds with a fresh log.
    let source = Arc::new(ScriptedSource::succeeding(2).failing_fetch_once());
    let observer = Arc::new(CollectingObserver::new());
    let runner = PipelineRunner::new(Arc::clone(&source) as Arc<dyn WorkSource>)
        .with_config(fast_config())
        .with_observer(Arc::clone(&observer) as Arc<dyn crate::observer::PipelineObserver>);

    runner.run().await.unwrap_err();
    let first_run_id = runner.run_id();
    let failed_log_len = runner.log().len();
    assert!(failed_log_len > 0);

    runner.run().await.unwrap();

    assert_eq!(runner.state(), RunState::Completed);
    assert_ne!(runner.run_id(), first_run_id);

    // The log restarted from sequence zero with the start banner.
    let entries = runner.log().entries();
    assert_eq!(entries[0].seq, 0);
    assert_eq!(entries[0].message, "Starting task processing...");

    // One terminal per run.
    let terminals = observer.terminals();
    assert_eq!(terminals.len(), 2);
    assert!(!terminals[0].is_completed());
    assert!(terminals[1].is_completed());
}

#[tokio::test]
async fn test_run_rejected_while_in_progress() {
    let source = Arc::new(
        ScriptedSource::succeeding(1).with_fetch_delay(Duration::from_millis(100)),
    );
    let runner = Arc::new(PipelineRunner::new(source).with_config(fast_config()));

    let background = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { runner.run().await })
    };

    // Give the background run time to leave Idle.
    sleep(Duration::from_millis(20)).await;
    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, PipelineError::AlreadyRunning));

    background.await.unwrap().unwrap();
    assert_eq!(runner.state(), RunState::Completed);
}

#[tokio::test]
async fn test_fatal_log_line_precedes_terminal() {
    let source = Arc::new(ScriptedSource::succeeding(3).failing_on(&["file_2.data"]));
    let runner = PipelineRunner::new(source)
        .with_config(fast_config().with_max_retries(0).with_concurrency_limit(1));

    runner.run().await.unwrap_err();

    let messages: Vec<String> = runner
        .log()
        .entries()
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert!(messages.iter().any(|m| m.starts_with("FATAL:")));
    assert!(messages.last().unwrap().starts_with("Error during processing:"));
}

#[tokio::test]
async fn test_run_id_assigned_per_run() {
    let source = Arc::new(ScriptedSource::succeeding(1));
    let runner = PipelineRunner::new(source).with_config(fast_config());

    assert!(runner.run_id().is_none());
    runner.run().await.unwrap();
    assert!(runner.run_id().is_some());
}
