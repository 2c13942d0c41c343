//! Exponential-backoff retry policy for the LLM capability calls (design §5/§9.1).
//!
//! Adapted from the teacher's `retry` module: same `RetryConfig`/`RetryPolicy`
//! shape and `Retryable`-trait-by-recoverability pattern, retuned to this
//! system's own defaults (3 retries, base 1s, cap 10s).

use std::time::Duration;

use crate::error::Error;

/// Anything that can report whether it's worth retrying.
pub trait Retryable {
    /// True if a retry might succeed where this attempt failed.
    fn is_recoverable(&self) -> bool;
}

impl Retryable for Error {
    fn is_recoverable(&self) -> bool {
        Error::is_recoverable(self)
    }
}

/// Tunable knobs for [`RetryPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on the backoff delay.
    pub max_delay: Duration,
    /// Fraction of the computed delay randomized as jitter.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    /// Override the number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the base delay.
    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Override the delay cap.
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Override the jitter fraction.
    #[must_use]
    pub fn with_jitter(mut self, jitter_factor: f64) -> Self {
        self.jitter_factor = jitter_factor;
        self
    }
}

/// Executes an async operation, retrying on recoverable errors with
/// exponential backoff and jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Build a policy from the given config.
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponential = self.config.base_delay.as_secs_f64() * 2f64.powi(attempt as i32);
        let capped = exponential.min(self.config.max_delay.as_secs_f64());
        let jitter = capped * self.config.jitter_factor * rand::random::<f64>();
        Duration::from_secs_f64(capped + jitter)
    }

    /// Run `operation` until it succeeds, a non-recoverable error is hit, or
    /// the retry budget is exhausted.
    pub async fn execute<F, T, Fut>(&self, mut operation: F) -> std::result::Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, Error>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_recoverable() && attempt < self.config.max_retries => {
                    let delay = self.calculate_delay(attempt);
                    tracing::warn!(attempt, ?delay, error = %err, "retrying after transient error");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_without_retry() {
        let policy = RetryPolicy::new(RetryConfig::default());
        let result = policy.execute(|| async { Ok::<_, Error>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn retries_recoverable_errors_then_succeeds() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(
            RetryConfig::default()
                .with_base_delay(Duration::from_millis(1))
                .with_max_delay(Duration::from_millis(2)),
        );
        let result = policy
            .execute(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(Error::BackendUnavailable("timeout".into()))
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_non_recoverable_errors() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(RetryConfig::default());
        let result: std::result::Result<(), Error> = policy
            .execute(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::InputValidation("bad".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
