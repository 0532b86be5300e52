use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration, Instant};

/// Fixed-delay gate in front of the price source.
///
/// The upstream scraping API allows one request at a time with a minimum
/// spacing between them, so every fetch acquires before sending. Tests
/// substitute an unthrottled limiter.
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    last_request: Arc<Mutex<Option<Instant>>>,
    min_delay: Duration,
}

impl RateLimiter {
    pub fn new(max_concurrent: usize, min_delay: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            last_request: Arc::new(Mutex::new(None)),
            min_delay,
        }
    }

    /// One request in flight, `min_delay` between request starts.
    pub fn fixed_delay(min_delay: Duration) -> Self {
        Self::new(1, min_delay)
    }

    /// Zero-delay limiter for tests and offline tooling.
    #[allow(dead_code)]
    pub fn unthrottled() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Blocks until a permit is free and the minimum spacing since the
    /// previous request has elapsed. The permit is released on drop.
    pub async fn acquire(&self) -> RateLimitGuard {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("rate limiter semaphore closed");

        // Read the wait outside the lock so the sleep never holds it.
        let wait = {
            let last = self.last_request.lock();
            last.and_then(|at| self.min_delay.checked_sub(at.elapsed()))
        };

        if let Some(delay) = wait {
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }

        *self.last_request.lock() = Some(Instant::now());

        RateLimitGuard { _permit: permit }
    }
}

/// Held for the duration of one upstream request.
pub struct RateLimitGuard {
    _permit: tokio::sync::OwnedSemaphorePermit,
}
