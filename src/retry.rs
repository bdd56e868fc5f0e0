//! Retry policy and backoff. See `spec.md` §4.5/§6.
//!
//! Generalises the teacher's `JobStateMachine` retry loop (`job.rs`,
//! `2u64.pow(retry_count)` capped at 3 attempts) into a configurable
//! policy with a delay cap and optional jitter, reused by the deployer's
//! provider-call retry loop and its stabilisation poll.

use crate::error::{ContainerError, FailureKind, Result};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub first_retry_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            first_retry_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt numbered `attempt` (0-based: the first
    /// retry after the initial try), capped at `max_delay` and optionally
    /// scaled by a uniform random jitter factor in `[0, 1)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let scaled = self.first_retry_delay.as_secs_f64() * self.backoff_factor.powi(attempt as i32);
        let capped = scaled.min(self.max_delay.as_secs_f64()).max(0.0);
        if self.jitter {
            let factor: f64 = rand::random();
            Duration::from_secs_f64(capped * factor)
        } else {
            Duration::from_secs_f64(capped)
        }
    }
}

/// Run `op` with capped-exponential-backoff retry on `FailureKind::Retryable`
/// errors. `skip_retry` forces immediate propagation regardless of
/// classification — the deployer's `SkipRetryFailuresForInstances` /
/// `SkipRetryFailuresForLinkNames` override (§4.5).
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, unit: &str, skip_retry: bool, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if skip_retry || err.failure_kind() != FailureKind::Retryable || attempt >= policy.max_retries {
                    return Err(err);
                }
                let delay = policy.delay_for_attempt(attempt);
                tracing::debug!(unit, attempt, delay_ms = delay.as_millis() as u64, "retrying after transient provider error");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Poll `check` until it reports stabilised, the policy's backoff
/// schedule paces the polls, or `deadline` elapses (§4.5 "Stabilisation").
pub async fn poll_until_stable<F, Fut>(policy: &RetryPolicy, unit: &str, deadline: Duration, mut check: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = tokio::time::Instant::now();
    let mut attempt = 0;
    loop {
        if check().await? {
            return Ok(());
        }
        if start.elapsed() >= deadline {
            return Err(ContainerError::StabilisationDeadlineExceeded(unit.to_string()));
        }
        let delay = policy.delay_for_attempt(attempt).min(deadline.saturating_sub(start.elapsed()));
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
