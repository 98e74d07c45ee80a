//! Exponential backoff policy for retry delays.

use std::time::Duration;

/// Computes the delay inserted before each retry attempt.
///
/// Pure and deterministic: `delay(n) = initial_delay * 2^(n-1)` for
/// `n >= 1`. Randomness, if any, belongs to the work being retried, not
/// to the backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    initial_delay: Duration,
}

impl BackoffPolicy {
    /// Creates a policy with the given initial delay.
    #[must_use]
    pub fn new(initial_delay: Duration) -> Self {
        Self { initial_delay }
    }

    /// Returns the configured initial delay.
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Returns the delay preceding attempt `attempt + 1`.
    ///
    /// `attempt` is the number of attempts already made (1-indexed);
    /// `delay(0)` is defined as the initial delay. Saturates instead of
    /// overflowing for large attempt counts.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}
