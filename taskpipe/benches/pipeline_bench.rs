//! Benchmarks for scheduler throughput and backoff computation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use taskpipe::backoff::BackoffPolicy;
use taskpipe::config::PipelineConfig;
use taskpipe::core::EventLog;
use taskpipe::executor::RetryingExecutor;
use taskpipe::scheduler::BoundedScheduler;
use taskpipe::source::WorkSource;

struct InstantSource;

#[async_trait]
impl WorkSource for InstantSource {
    async fn fetch_work_list(&self) -> anyhow::Result<Vec<String>> {
        Ok(vec![])
    }

    async fn execute_work_item(&self, item: &str) -> anyhow::Result<String> {
        Ok(format!("Successfully loaded {item}"))
    }

    async fn finalize(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

fn backoff_benchmark(c: &mut Criterion) {
    let policy = BackoffPolicy::new(Duration::from_millis(500));
    c.bench_function("backoff_delay", |b| {
        b.iter(|| {
            for attempt in 1..=10u32 {
                black_box(policy.delay(black_box(attempt)));
            }
        });
    });
}

fn scheduler_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let config = PipelineConfig::new().with_concurrency_limit(8);

    c.bench_function("scheduler_100_instant_items", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let log = Arc::new(EventLog::new());
                let executor = Arc::new(RetryingExecutor::new(
                    Arc::new(InstantSource),
                    log,
                    &config,
                ));
                let scheduler = BoundedScheduler::new(executor, config.concurrency_limit);
                let items = (1..=100).map(|i| format!("item_{i}")).collect();
                scheduler.run(items, |_| {}).await.expect("run");
            });
        });
    });
}

criterion_group!(benches, backoff_benchmark, scheduler_benchmark);
criterion_main!(benches);
