//! Retry and timeout wrappers for platform calls.
//!
//! [`with_retry`] retries transient network failures with exponential
//! backoff (2s, 4s, 8s by default). Anything that is not
//! [`Error::is_retryable`] fails on the first attempt.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use backon::{ExponentialBuilder, Retryable};

use crate::{Error, Result};

/// Retry behaviour for one class of operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: usize,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Per-attempt timeout used by [`with_retry_and_timeout`].
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(2000),
            timeout: Duration::from_millis(30_000),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_factor(2.0)
            .with_max_times(self.max_retries)
    }
}

/// Run `op`, retrying retryable failures according to `policy`.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let attempts = AtomicU32::new(0);
    let max_attempts = policy.max_retries + 1;

    let result = (|| {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(operation, attempt, max_attempts, "starting attempt");
        op()
    })
    .retry(policy.backoff())
    .when(Error::is_retryable)
    .notify(|err: &Error, delay: Duration| {
        tracing::warn!(
            operation,
            attempt = attempts.load(Ordering::Relaxed),
            max_attempts,
            error = %err,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, retrying"
        );
    })
    .await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let total_attempts = attempts.load(Ordering::Relaxed);
    match &result {
        Ok(_) => tracing::debug!(operation, elapsed_ms, total_attempts, "completed"),
        Err(err) => tracing::error!(
            operation,
            elapsed_ms,
            total_attempts,
            retryable = err.is_retryable(),
            error = %err,
            "operation failed"
        ),
    }
    result
}

/// Fail with [`Error::Timeout`] when `fut` does not finish within `timeout`.
pub async fn with_timeout<T, Fut>(timeout: Duration, operation: &str, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            let millis = timeout.as_millis() as u64;
            tracing::error!(operation, timeout_ms = millis, "operation timed out");
            Err(Error::Timeout {
                operation: operation.to_string(),
                millis,
            })
        }
    }
}

/// [`with_retry`] around [`with_timeout`]: each attempt gets its own timeout.
pub async fn with_retry_and_timeout<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let timeout = policy.timeout;
    with_retry(policy, operation, || with_timeout(timeout, operation, op())).await
}
