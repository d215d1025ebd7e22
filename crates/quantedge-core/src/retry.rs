//! Explicit retry policy applied at the fetcher boundary.

use std::time::Duration;

/// Capped exponential backoff with an attempt budget.
///
/// `delay_for_attempt(0)` is the delay after the first failure; the
/// delay doubles each attempt and is capped at `max_delay`. Jitter,
/// when enabled, spreads the delay by +/- 50%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(20),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no sleeping. Useful in tests.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    /// Delay to sleep after the failure of attempt `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let scale = 2f64.powi(attempt.min(31) as i32);
        let seconds = self.base_delay.as_secs_f64() * scale;
        let capped = seconds.min(self.max_delay.as_secs_f64());
        let mut delay = Duration::from_secs_f64(capped);

        if self.jitter {
            let half_ms = (delay.as_millis() as f64 * 0.5) as u64;
            let offset = fastrand::u64(0..=(half_ms * 2));
            let total_ms = delay.as_millis() as i64 + (offset as i64 - half_ms as i64);
            delay = Duration::from_millis(total_ms.max(0) as u64);
        }

        delay
    }
}
