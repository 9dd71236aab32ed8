//! Retry with exponential backoff
//!
//! A generic utility for any fallible async operation whose rate-limit
//! failures are worth retrying. Every attempt, including the first,
//! pays its delay up front — the leading delay throttles bursts against
//! the generation API rather than merely spacing retries.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Retry policy: attempt budget and backoff shape
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts (not retries after the first)
    pub max_attempts: u32,

    /// Delay before the first attempt
    pub initial_delay: Duration,

    /// Backoff multiplier applied per attempt
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay before the given zero-indexed attempt:
    /// `initial_delay * multiplier^attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay * self.multiplier.saturating_pow(attempt)
    }
}

/// Injectable sleep capability so tests can observe backoff timing
/// without waiting it out
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Sleep for the given duration
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
#[derive(Debug, Clone, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Run `operation` under the retry policy.
///
/// Rate-limit failures are retried while attempts remain and propagated
/// once the budget is exhausted; any other failure is fatal immediately.
pub async fn retry_with_backoff<T, F, Fut, S>(
    policy: &RetryPolicy,
    sleeper: &S,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    S: Sleeper + ?Sized,
{
    let mut last_rate_limit = None;

    for attempt in 0..policy.max_attempts {
        let delay = policy.delay_for(attempt);
        debug!(
            "Attempt {}/{} after {:?} delay",
            attempt + 1,
            policy.max_attempts,
            delay
        );
        sleeper.sleep(delay).await;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_rate_limit() => {
                warn!(
                    "Rate limited on attempt {}/{}",
                    attempt + 1,
                    policy.max_attempts
                );
                last_rate_limit = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_rate_limit.unwrap_or_else(|| Error::Other("retry budget was zero".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Records requested delays instead of sleeping
    #[derive(Default)]
    struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    impl RecordingSleeper {
        fn total(&self) -> Duration {
            self.delays.lock().unwrap().iter().sum()
        }
    }

    fn rate_limit() -> Error {
        Error::RateLimit {
            retry_after_secs: 1,
        }
    }

    #[tokio::test]
    async fn test_success_after_k_failures_sleeps_geometric_total() {
        let policy = RetryPolicy::default();
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);

        let result = retry_with_backoff(&policy, &sleeper, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(rate_limit())
                } else {
                    Ok("done")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1 + 2 + 4 seconds: every attempt pays its delay up front.
        assert_eq!(sleeper.total(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_first_attempt_pays_initial_delay() {
        let policy = RetryPolicy::default();
        let sleeper = RecordingSleeper::default();

        retry_with_backoff(&policy, &sleeper, || async { Ok(()) })
            .await
            .unwrap();

        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_secs(1)]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_after_exactly_max_attempts() {
        let policy = RetryPolicy::default();
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);

        let result: Result<()> = retry_with_backoff(&policy, &sleeper, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(rate_limit()) }
        })
        .await;

        assert!(matches!(result, Err(Error::RateLimit { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_rate_limit_failure_is_fatal_immediately() {
        let policy = RetryPolicy::default();
        let sleeper = RecordingSleeper::default();
        let calls = AtomicU32::new(0);

        let result: Result<()> = retry_with_backoff(&policy, &sleeper, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Auth("bad key".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(Error::Auth(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
