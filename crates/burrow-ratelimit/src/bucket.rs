use jiff::Timestamp;

/// A single client's token bucket.
///
/// Refill is lazy: nothing runs between checks, the tokens owed for the
/// elapsed time are added when the bucket is next touched.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    rate: f64,
    tokens: f64,
    last_refill: Timestamp,
}

impl TokenBucket {
    /// Creates a full bucket. `rate` is tokens per second.
    pub fn full(capacity: u32, rate: f64, now: Timestamp) -> Self {
        let capacity = f64::from(capacity);
        Self {
            capacity,
            rate,
            tokens: capacity,
            last_refill: now,
        }
    }

    /// Adds the tokens earned since the last refill, up to capacity.
    ///
    /// A clock that moves backward earns nothing and does not rewind
    /// `last_refill`.
    pub fn refill(&mut self, now: Timestamp) {
        let elapsed = now.duration_since(self.last_refill);
        if !elapsed.is_positive() {
            return;
        }
        self.tokens = (self.tokens + elapsed.as_secs_f64() * self.rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Takes one token if one is available.
    pub fn try_acquire(&mut self, now: Timestamp) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Tokens left after refilling at `now`.
    pub fn available(&mut self, now: Timestamp) -> f64 {
        self.refill(now);
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    fn start() -> Timestamp {
        Timestamp::from_second(1_000_000).unwrap()
    }

    #[test]
    fn starts_full_and_drains() {
        let now = start();
        let mut bucket = TokenBucket::full(3, 3.0, now);

        assert!(bucket.try_acquire(now));
        assert!(bucket.try_acquire(now));
        assert!(bucket.try_acquire(now));
        assert!(!bucket.try_acquire(now));
    }

    #[test]
    fn refills_continuously() {
        let now = start();
        let mut bucket = TokenBucket::full(10, 10.0, now);
        for _ in 0..10 {
            assert!(bucket.try_acquire(now));
        }

        let later = now + SignedDuration::from_millis(250);
        assert_eq!(bucket.available(later), 2.5);
        assert!(bucket.try_acquire(later));
        assert!(bucket.try_acquire(later));
        assert!(!bucket.try_acquire(later));
    }

    #[test]
    fn never_exceeds_capacity() {
        let now = start();
        let mut bucket = TokenBucket::full(5, 5.0, now);
        assert!(bucket.try_acquire(now));

        assert_eq!(bucket.available(now + SignedDuration::from_hours(24)), 5.0);
    }

    #[test]
    fn backward_clock_adds_nothing() {
        let now = start();
        let mut bucket = TokenBucket::full(2, 2.0, now);
        assert!(bucket.try_acquire(now));
        assert!(bucket.try_acquire(now));

        let earlier = now - SignedDuration::from_secs(30);
        assert!(!bucket.try_acquire(earlier));
        assert_eq!(bucket.available(now), 0.0);
    }
}
