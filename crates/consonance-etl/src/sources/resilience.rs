//! Rate limiting and retry for remote sources.

use std::future::Future;
use std::sync::Arc;

use backon::{ExponentialBuilder, Retryable};
use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration};

use crate::error::{EtlError, EtlResult};

/// Attempts after the first before a transient failure is given up on.
const MAX_RETRIES: usize = 3;

/// Per-source rate limiter.
///
/// Limits throughput to a configurable number of requests per second by
/// combining a single-permit [`Semaphore`] with a fixed sleep interval.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    interval: Duration,
}

impl RateLimiter {
    /// Creates a new `RateLimiter` that allows at most
    /// `requests_per_second` requests per second.
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            interval: Duration::from_millis(1000 / u64::from(requests_per_second.max(1))),
        }
    }

    /// Waits until a request slot is available, then holds the slot for
    /// the configured interval to enforce the rate limit.
    pub async fn acquire(&self) {
        // The semaphore is never closed; a closed one simply stops limiting.
        let _permit = self.semaphore.acquire().await.ok();
        sleep(self.interval).await;
    }
}

/// Run `op`, retrying with exponential backoff while it fails with a
/// transient error.
pub async fn retry_transient<T, F, Fut>(source_name: &str, op: F) -> EtlResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = EtlResult<T>>,
{
    op.retry(
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(250))
            .with_max_times(MAX_RETRIES),
    )
    .when(EtlError::is_transient)
    .notify(|err: &EtlError, after: Duration| {
        log::warn!("{source_name} request failed ({err}), retrying in {after:?}");
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_rate_limiter_spaces_requests() {
        let limiter = RateLimiter::new(20);
        let start = tokio::time::Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = retry_transient("test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(EtlError::http("test", "503"))
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_on_permanent() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: EtlResult<()> = retry_transient("test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(EtlError::parse("test", "garbage"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
