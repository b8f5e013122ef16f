use std::time::{Duration, Instant};

/// Rate limiter that keeps only the latest value.
///
/// At most one emission per interval. A value offered too early is parked and
/// replaced by any newer offer; `poll` hands it out once the interval elapses.
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Create a throttle emitting at most `rate_hz` times per second
    pub fn new(rate_hz: f64) -> Self {
        let interval = if rate_hz > 0.0 {
            Duration::from_secs_f64(1.0 / rate_hz)
        } else {
            Duration::ZERO
        };
        Self::with_interval(interval)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    fn is_due(&self, now: Instant) -> bool {
        match self.last_emit {
            None => true,
            // A clock that went backwards counts as due
            Some(last) => match now.checked_duration_since(last) {
                Some(elapsed) => elapsed >= self.interval,
                None => true,
            },
        }
    }

    /// Offer a value; returns it back if it may be emitted right now
    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        if self.is_due(now) {
            self.pending = None;
            self.last_emit = Some(now);
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Emit the parked value once the interval has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.is_due(now) {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Drain the parked value regardless of timing
    pub fn take_pending(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn reset(&mut self) {
        self.last_emit = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_offer_passes() {
        let mut throttle = Throttle::new(15.0);
        assert_eq!(throttle.offer(1, Instant::now()), Some(1));
    }

    #[test]
    fn test_latest_value_wins() {
        let t0 = Instant::now();
        let mut throttle = Throttle::with_interval(Duration::from_millis(100));
        assert_eq!(throttle.offer(1, t0), Some(1));
        assert_eq!(throttle.offer(2, t0 + Duration::from_millis(10)), None);
        assert_eq!(throttle.offer(3, t0 + Duration::from_millis(20)), None);

        // Not yet due
        assert_eq!(throttle.poll(t0 + Duration::from_millis(50)), None);
        // Trailing emission carries the newest value only
        assert_eq!(throttle.poll(t0 + Duration::from_millis(100)), Some(3));
        assert_eq!(throttle.poll(t0 + Duration::from_millis(300)), None);
    }

    #[test]
    fn test_offer_after_interval_emits() {
        let t0 = Instant::now();
        let mut throttle = Throttle::with_interval(Duration::from_millis(66));
        assert!(throttle.offer(1, t0).is_some());
        assert!(throttle.offer(2, t0 + Duration::from_millis(65)).is_none());
        assert_eq!(throttle.offer(3, t0 + Duration::from_millis(66)), Some(3));
        assert_eq!(throttle.take_pending(), None);
    }

    #[test]
    fn test_take_pending_and_reset() {
        let t0 = Instant::now();
        let mut throttle = Throttle::with_interval(Duration::from_secs(1));
        throttle.offer(1, t0);
        throttle.offer(2, t0);
        assert_eq!(throttle.take_pending(), Some(2));
        assert_eq!(throttle.take_pending(), None);

        throttle.offer(4, t0);
        throttle.reset();
        assert_eq!(throttle.offer(5, t0), Some(5));
    }

    #[test]
    fn test_zero_rate_never_throttles() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(0.0);
        assert_eq!(throttle.offer(1, t0), Some(1));
        assert_eq!(throttle.offer(2, t0), Some(2));
    }
}
