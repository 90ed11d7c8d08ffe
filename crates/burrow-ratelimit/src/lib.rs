//! Per-client token-bucket rate limiting.
//!
//! Each client key gets its own bucket holding up to `capacity` tokens,
//! refilled continuously at `capacity` per `interval`. Buckets live in a
//! bounded `moka` cache, so clients that go quiet are forgotten and the
//! limiter's memory stays within `max_clients` buckets.

pub mod bucket;
pub mod config;
pub mod error;
pub mod limiter;

pub use bucket::TokenBucket;
pub use config::RateLimiterConfig;
pub use error::RateLimitError;
pub use limiter::RateLimiter;
