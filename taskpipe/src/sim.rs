//! Simulated work source with configurable latency and failure rate.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

use crate::source::WorkSource;

/// A [`WorkSource`] that simulates I/O with random latency and failures.
///
/// Defaults mirror the reference workload: 20 items named
/// `file_N.data`, a ~500ms fetch, per-item latency of 1-6 seconds with a
/// 15% failure chance, and a ~1 second finalization step. Tests compress
/// the delays to keep runs fast.
#[derive(Debug, Clone)]
pub struct SimWorkSource {
    item_count: usize,
    fetch_delay: Duration,
    min_latency: Duration,
    max_latency: Duration,
    failure_rate: f64,
    finalize_delay: Duration,
}

impl Default for SimWorkSource {
    fn default() -> Self {
        Self {
            item_count: 20,
            fetch_delay: Duration::from_millis(500),
            min_latency: Duration::from_secs(1),
            max_latency: Duration::from_secs(6),
            failure_rate: 0.15,
            finalize_delay: Duration::from_secs(1),
        }
    }
}

impl SimWorkSource {
    /// Creates a simulated source with the default workload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of items the fetch stage produces.
    #[must_use]
    pub fn with_item_count(mut self, count: usize) -> Self {
        self.item_count = count;
        self
    }

    /// Sets the fetch stage delay.
    #[must_use]
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Sets the per-item latency range.
    #[must_use]
    pub fn with_latency_range(mut self, min: Duration, max: Duration) -> Self {
        self.min_latency = min;
        self.max_latency = max.max(min);
        self
    }

    /// Sets the per-item failure probability (clamped to 0.0..=1.0).
    #[must_use]
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the finalization delay.
    #[must_use]
    pub fn with_finalize_delay(mut self, delay: Duration) -> Self {
        self.finalize_delay = delay;
        self
    }

    fn roll_latency(&self) -> Duration {
        if self.max_latency <= self.min_latency {
            return self.min_latency;
        }
        rand::thread_rng().gen_range(self.min_latency..=self.max_latency)
    }

    fn roll_failure(&self) -> bool {
        self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate)
    }
}

#[async_trait]
impl WorkSource for SimWorkSource {
    async fn fetch_work_list(&self) -> anyhow::Result<Vec<String>> {
        sleep(self.fetch_delay).await;
        Ok((1..=self.item_count)
            .map(|i| format!("file_{i}.data"))
            .collect())
    }

    async fn execute_work_item(&self, item: &str) -> anyhow::Result<String> {
        let latency = self.roll_latency();
        let fails = self.roll_failure();
        sleep(latency).await;

        if fails {
            anyhow::bail!("Failed to load {item}");
        }
        Ok(format!("Successfully loaded {item}"))
    }

    async fn finalize(&self) -> anyhow::Result<()> {
        sleep(self.finalize_delay).await;
        Ok(())
    }
}
