use crate::error::{RateLimitError, Result};
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Configuration for [`RateLimiter`](crate::RateLimiter).
#[derive(Debug, Clone, TypedBuilder)]
pub struct RateLimiterConfig {
    /// Burst size: the most requests a client can make back to back.
    #[builder(default = 10)]
    pub capacity: u32,

    /// Time to refill a bucket from empty to `capacity`.
    #[builder(default = Duration::from_secs(1))]
    pub interval: Duration,

    /// Upper bound on tracked clients. The least valuable buckets are
    /// evicted beyond it.
    #[builder(default = 100_000)]
    pub max_clients: u64,

    /// Buckets untouched for this long are dropped.
    #[builder(default = Duration::from_secs(10 * 60))]
    pub idle_timeout: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RateLimiterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(RateLimitError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.interval.is_zero() {
            return Err(RateLimitError::InvalidConfig(
                "interval must be non-zero".to_string(),
            ));
        }
        if self.max_clients == 0 {
            return Err(RateLimitError::InvalidConfig(
                "max_clients must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Tokens added per second of elapsed time.
    pub fn refill_rate(&self) -> f64 {
        f64::from(self.capacity) / self.interval.as_secs_f64()
    }
}
