//! Minimum-spacing rate limiter
//!
//! Holds the time the last request was issued and makes callers wait until
//! `min_delay` has passed since then.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Throttle state at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    /// A request may be issued now
    Idle,
    /// A request must wait this long first
    Throttled(Duration),
}

/// Request spacing bookkeeping for one client
#[derive(Debug, Clone)]
pub struct Throttle {
    min_delay: Duration,
    last_request: Option<Instant>,
}

impl Throttle {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: None,
        }
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// When the last request was issued
    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// Time left before the next request may be issued
    pub fn time_until_next_allowed(&self, now: Instant) -> Duration {
        match self.last_request {
            Some(last) => self
                .min_delay
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub fn state(&self, now: Instant) -> ThrottleState {
        match self.time_until_next_allowed(now) {
            d if d.is_zero() => ThrottleState::Idle,
            d => ThrottleState::Throttled(d),
        }
    }

    /// Mark a request as issued at `now`
    pub fn record_request_issued(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    /// Sleep until a request is allowed, then record it as issued.
    /// Returns how long the caller was held back.
    pub async fn acquire(&mut self) -> Duration {
        let wait = self.time_until_next_allowed(Instant::now());
        if !wait.is_zero() {
            debug!("Rate limiting: waiting {}ms", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
        self.record_request_issued(Instant::now());
        wait
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::DEFAULT_MIN_DELAY_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_is_not_delayed() {
        let throttle = Throttle::default();
        let now = Instant::now();
        assert_eq!(throttle.time_until_next_allowed(now), Duration::ZERO);
        assert_eq!(throttle.state(now), ThrottleState::Idle);
    }

    #[test]
    fn test_time_until_next_allowed() {
        let mut throttle = Throttle::new(Duration::from_millis(2000));
        let start = Instant::now();
        throttle.record_request_issued(start);

        let later = start + Duration::from_millis(500);
        assert_eq!(throttle.time_until_next_allowed(later), Duration::from_millis(1500));
        assert_eq!(
            throttle.state(later),
            ThrottleState::Throttled(Duration::from_millis(1500))
        );

        let much_later = start + Duration::from_millis(2500);
        assert_eq!(throttle.time_until_next_allowed(much_later), Duration::ZERO);
        assert_eq!(throttle.state(much_later), ThrottleState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_spaces_requests() {
        let mut throttle = Throttle::new(Duration::from_millis(2000));

        let first = throttle.acquire().await;
        let t1 = throttle.last_request().unwrap();
        assert_eq!(first, Duration::ZERO);

        tokio::time::advance(Duration::from_millis(300)).await;

        let second = throttle.acquire().await;
        let t2 = throttle.last_request().unwrap();
        assert_eq!(second, Duration::from_millis(1700));
        assert!(t2 - t1 >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_delay_elapsed() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        throttle.acquire().await;
        tokio::time::advance(Duration::from_millis(150)).await;
        assert_eq!(throttle.acquire().await, Duration::ZERO);
    }
}
