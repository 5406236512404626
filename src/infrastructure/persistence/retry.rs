//! Transparent retry of transient store failures.

use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::domain::repositories::StoreError;

/// Upper bound for a single backoff delay.
const MAX_DELAY: Duration = Duration::from_secs(2);

/// How many times, and how patiently, a store operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. `0` disables retrying.
    pub attempts: usize,
    /// First backoff delay; each following delay doubles.
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(attempts: usize, base_delay_ms: u64) -> Self {
        Self {
            attempts,
            base_delay_ms,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(2)
            .factor(self.base_delay_ms / 2)
            .max_delay(MAX_DELAY)
            .map(jitter)
            .take(self.attempts)
    }

    /// Runs `action`, retrying it while it fails with a retryable error.
    ///
    /// Errors for which [`StoreError::is_retryable`] is false are returned
    /// immediately. The last error is returned once attempts are exhausted.
    pub async fn run<T, A, Fut>(&self, operation: &'static str, action: A) -> Result<T, StoreError>
    where
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        RetryIf::spawn(self.strategy(), action, |e: &StoreError| {
            let retry = e.is_retryable();
            if retry {
                warn!("Store operation {} failed, retrying: {}", operation, e);
            }
            retry
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(3, 0);

        let result = policy
            .run("test", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(StoreError::Unavailable("pool timed out".into()))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(2, 0);

        let result: Result<(), _> = policy
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(StoreError::Unavailable("down".into())) }
            })
            .await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_fatal_errors() {
        let calls = AtomicUsize::new(0);
        let policy = RetryPolicy::new(5, 0);

        let result: Result<(), _> = policy
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(StoreError::Backend("connection reset".into())) }
            })
            .await;

        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
