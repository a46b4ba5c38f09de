use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

/// Minimum-interval rate limiter for outbound board requests.
///
/// The interval is derived from a requests-per-second ceiling. The
/// last-request timestamp sits behind a mutex and the lock is held across
/// the sleep, so the check-sleep-update sequence is one critical section:
/// two concurrent callers can never both observe "interval elapsed" and
/// fire inside the same window. A rate of zero (or below) disables the
/// limiter entirely.
pub struct RateLimiter {
    requests_per_second: f64,
    min_interval: Option<Duration>,
    last_request_time: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified rate (requests per second)
    #[must_use]
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Some(Duration::from_secs_f64(1.0 / requests_per_second))
        } else {
            None
        };

        debug!(
            "Created rate limiter: {} requests per second",
            requests_per_second
        );

        Self {
            requests_per_second,
            min_interval,
            last_request_time: Mutex::new(None),
        }
    }

    /// Wait until it's safe to make a request (respects the rate limit).
    pub async fn acquire(&self) {
        let Some(min_interval) = self.min_interval else {
            return;
        };

        let mut last_time = self.last_request_time.lock().await;

        if let Some(last) = *last_time {
            let elapsed = last.elapsed();
            if elapsed < min_interval {
                let wait_time = min_interval - elapsed;
                debug!("Rate limiter: waiting {}ms", wait_time.as_millis());
                sleep(wait_time).await;
            }
        }

        *last_time = Some(Instant::now());
    }

    /// Get the configured rate limit (requests per second)
    #[must_use]
    pub const fn rate_per_second(&self) -> f64 {
        self.requests_per_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_basic() {
        let limiter = RateLimiter::new(2.0); // 2 requests per second

        // First request should be immediate
        let start = Instant::now();
        limiter.acquire().await;
        let first_duration = start.elapsed();
        assert!(first_duration < Duration::from_millis(100));

        // Second request should wait for the interval
        limiter.acquire().await;
        let second_duration = start.elapsed();
        assert!(second_duration >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_rate_limiter_zero_rate_disables() {
        let limiter = RateLimiter::new(0.0);

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_rate_limiter_concurrent_callers_share_window() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new(5.0)); // 200ms interval

        let start = Instant::now();
        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        // Three acquisitions at 5/sec need at least two full intervals.
        assert!(start.elapsed() >= Duration::from_millis(350));
    }

    #[test]
    fn test_rate_per_second_accessor() {
        let limiter = RateLimiter::new(1.5);
        assert!((limiter.rate_per_second() - 1.5).abs() < f64::EPSILON);
    }
}
