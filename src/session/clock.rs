//! Time sources and the idle-lock deadline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source for the idle-lock timer.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same offset, so a test can keep one handle and give
/// another to the session.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move time forward by `by` (millisecond resolution).
    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

/// A single re-armable deadline.
///
/// Arming always replaces the previous deadline, so there is never more
/// than one pending expiry.
#[derive(Debug, Clone, Default)]
pub struct IdleTimer {
    deadline: Option<Instant>,
}

impl IdleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now: Instant, timeout: Duration) {
        self.deadline = Some(now + timeout);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// `true` once `now` has reached the deadline.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left before expiry, or `None` if disarmed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();

        clock.advance(Duration::from_secs(10));
        assert_eq!(other.now() - start, Duration::from_secs(10));
    }

    #[test]
    fn rearming_replaces_deadline() {
        let clock = ManualClock::new();
        let mut timer = IdleTimer::new();
        timer.arm(clock.now(), Duration::from_secs(60));

        clock.advance(Duration::from_secs(50));
        timer.arm(clock.now(), Duration::from_secs(60));

        clock.advance(Duration::from_secs(20));
        assert!(!timer.is_expired(clock.now()));
        assert_eq!(timer.remaining(clock.now()), Some(Duration::from_secs(40)));

        clock.advance(Duration::from_secs(40));
        assert!(timer.is_expired(clock.now()));
    }

    #[test]
    fn disarmed_timer_never_expires() {
        let clock = ManualClock::new();
        let mut timer = IdleTimer::new();
        timer.arm(clock.now(), Duration::from_secs(1));
        timer.disarm();

        clock.advance(Duration::from_secs(3600));
        assert!(!timer.is_armed());
        assert!(!timer.is_expired(clock.now()));
        assert_eq!(timer.remaining(clock.now()), None);
    }
}
