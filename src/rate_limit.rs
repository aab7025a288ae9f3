use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use std::num::NonZeroU32;
use std::time::Duration;

type DirectLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Keeps consecutive requests at least `spacing` apart.
///
/// A burst of one means the limiter never holds more than a single permit, so
/// each grant has to wait out the full period since the previous one.
pub struct RateLimiter {
    inner: DirectLimiter,
}

impl RateLimiter {
    pub fn new(spacing: Duration) -> Self {
        let quota = Quota::with_period(spacing)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX))
            .allow_burst(NonZeroU32::MIN);
        Self {
            inner: DirectLimiter::direct(quota),
        }
    }

    pub async fn acquire(&mut self) {
        self.inner.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn first_acquire_is_immediate() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn consecutive_grants_are_spaced() {
        let spacing = Duration::from_millis(40);
        let mut limiter = RateLimiter::new(spacing);

        let mut grants = Vec::new();
        for _ in 0..5 {
            limiter.acquire().await;
            grants.push(Instant::now());
        }
        for pair in grants.windows(2) {
            // GCRA works in nanosecond steps; allow a millisecond of clock skew.
            assert!(pair[1] - pair[0] + Duration::from_millis(1) >= spacing);
        }
    }

    #[tokio::test]
    async fn idle_time_counts_towards_spacing() {
        let mut limiter = RateLimiter::new(Duration::from_millis(30));
        limiter.acquire().await;
        tokio::time::sleep(Duration::from_millis(60)).await;

        let before = Instant::now();
        limiter.acquire().await;
        assert!(before.elapsed() < Duration::from_millis(20));
    }
}
