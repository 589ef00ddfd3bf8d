use std::future::Future;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::domain::{
    errors::{ConvergenceError, ProbeError},
    models::RetryPolicy,
};

/// Retries a read-after-write probe until an eventually consistent endpoint
/// reflects the just-completed mutation.
///
/// The probe distinguishes "not yet visible" from a permanent failure; only
/// the former is retried. Delays grow from the policy's initial interval by
/// its multiplier, capped at the max interval, and the whole poll stops once
/// the elapsed-time budget is spent.
pub struct ConvergencePoller {
    policy: RetryPolicy,
}

impl ConvergencePoller {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub async fn poll_until<F, Fut>(&self, mut check: F) -> Result<(), ConvergenceError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<(), ProbeError>> + Send,
    {
        let start = Instant::now();
        let mut interval = self.policy.initial_interval;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            match check().await {
                Ok(()) => {
                    debug!(attempts, "endpoint converged");
                    return Ok(());
                }
                Err(ProbeError::Permanent(err)) => {
                    return Err(ConvergenceError::Permanent(err));
                }
                Err(ProbeError::NotYetVisible) => {}
            }

            let elapsed = start.elapsed();
            if elapsed >= self.policy.max_elapsed_time {
                return Err(ConvergenceError::TimedOut { waited: elapsed });
            }

            // Clamp the sleep so the deadline is never overshot
            let wait = interval.min(self.policy.max_elapsed_time - elapsed);
            sleep(wait).await;

            if start.elapsed() >= self.policy.max_elapsed_time {
                return Err(ConvergenceError::TimedOut {
                    waited: start.elapsed(),
                });
            }

            interval = self.policy.next_interval(interval);
        }
    }
}
