use std::time::Duration;

/// Backoff configuration for one convergence poll.
///
/// Immutable once built; construct a fresh value per poll invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    pub max_elapsed_time: Duration,
}

impl RetryPolicy {
    /// The interval that follows `current` in the backoff schedule
    pub fn next_interval(&self, current: Duration) -> Duration {
        let scaled = current.mul_f64(self.multiplier);
        scaled.min(self.max_interval)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            multiplier: 2.0,
            max_interval: Duration::from_secs(30),
            max_elapsed_time: Duration::from_secs(120),
        }
    }
}
