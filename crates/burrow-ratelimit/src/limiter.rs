use crate::bucket::TokenBucket;
use crate::config::RateLimiterConfig;
use crate::error::{RateLimitError, Result};
use burrow_core::{Clock, SystemClock};
use moka::sync::Cache;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// Token-bucket rate limiter keyed by client identity.
///
/// Buckets are created on first sight with a full allowance and kept in a
/// bounded cache. A client evicted for idleness or capacity is treated as
/// new when it returns.
#[derive(Clone)]
pub struct RateLimiter<C = SystemClock> {
    buckets: Cache<String, Arc<Mutex<TokenBucket>>>,
    capacity: u32,
    rate: f64,
    clock: C,
}

impl RateLimiter<SystemClock> {
    pub fn new(config: RateLimiterConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Creates a limiter that measures refill with `clock`.
    pub fn with_clock(config: RateLimiterConfig, clock: C) -> Result<Self> {
        config.validate()?;

        let buckets = Cache::builder()
            .max_capacity(config.max_clients)
            .time_to_idle(config.idle_timeout)
            .build();

        Ok(Self {
            buckets,
            capacity: config.capacity,
            rate: config.refill_rate(),
            clock,
        })
    }

    /// Takes one token from `client_key`'s bucket, returning whether the
    /// request may proceed.
    pub fn allow(&self, client_key: &str) -> bool {
        let now = self.clock.now();
        let bucket = self.buckets.get_with(client_key.to_owned(), || {
            trace!(client = client_key, "tracking new client");
            Arc::new(Mutex::new(TokenBucket::full(self.capacity, self.rate, now)))
        });

        let allowed = bucket.lock().try_acquire(now);
        allowed
    }

    /// Like [`RateLimiter::allow`], but denial is an error.
    pub fn check(&self, client_key: &str) -> Result<()> {
        if self.allow(client_key) {
            Ok(())
        } else {
            warn!(client = client_key, "rate limit exceeded");
            Err(RateLimitError::RateExceeded(client_key.to_string()))
        }
    }

    /// Number of clients currently holding a bucket.
    pub fn tracked_clients(&self) -> u64 {
        self.buckets.run_pending_tasks();
        self.buckets.entry_count()
    }
}

impl<C> fmt::Debug for RateLimiter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("capacity", &self.capacity)
            .field("rate", &self.rate)
            .field("clients", &self.buckets.entry_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::ManualClock;
    use jiff::{SignedDuration, Timestamp};
    use std::time::Duration;

    fn limiter(capacity: u32) -> (RateLimiter<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Timestamp::from_second(1_000_000).unwrap());
        let config = RateLimiterConfig::builder().capacity(capacity).build();
        (RateLimiter::with_clock(config, clock.clone()).unwrap(), clock)
    }

    #[test]
    fn burst_then_deny_then_refill() {
        let (limiter, clock) = limiter(3);

        assert!(limiter.allow("client"));
        assert!(limiter.allow("client"));
        assert!(limiter.allow("client"));
        assert!(!limiter.allow("client"));

        clock.advance(SignedDuration::from_secs(1));
        assert!(limiter.allow("client"));
    }

    #[test]
    fn partial_refill() {
        let (limiter, clock) = limiter(4);
        for _ in 0..4 {
            assert!(limiter.allow("client"));
        }

        clock.advance(SignedDuration::from_millis(500));
        assert!(limiter.allow("client"));
        assert!(limiter.allow("client"));
        assert!(!limiter.allow("client"));
    }

    #[test]
    fn clients_are_independent() {
        let (limiter, _) = limiter(1);

        assert!(limiter.allow("alice"));
        assert!(!limiter.allow("alice"));
        assert!(limiter.allow("bob"));
        assert!(!limiter.allow("bob"));
    }

    #[test]
    fn check_reports_the_client() {
        let (limiter, _) = limiter(1);

        assert!(limiter.check("10.0.0.1").is_ok());
        assert_eq!(
            limiter.check("10.0.0.1"),
            Err(RateLimitError::RateExceeded("10.0.0.1".to_string()))
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RateLimiterConfig::builder().capacity(0).build();
        assert!(matches!(
            RateLimiter::new(config),
            Err(RateLimitError::InvalidConfig(_))
        ));

        let config = RateLimiterConfig::builder()
            .interval(Duration::ZERO)
            .build();
        assert!(matches!(
            RateLimiter::new(config),
            Err(RateLimitError::InvalidConfig(_))
        ));
    }

    #[test]
    fn tracked_clients_stays_bounded() {
        let config = RateLimiterConfig::builder().max_clients(16).build();
        let limiter = RateLimiter::new(config).unwrap();

        for i in 0..200 {
            assert!(limiter.allow(&format!("client-{i}")));
            if i % 20 == 19 {
                assert!(limiter.tracked_clients() <= 16);
            }
        }
    }

    #[test]
    fn concurrent_clients_share_one_budget() {
        let (limiter, _) = limiter(50);
        let limiter = &limiter;

        let allowed: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(move || (0..20).filter(|_| limiter.allow("shared")).count())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(allowed, 50);
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
