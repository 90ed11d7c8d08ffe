use std::sync::Arc;

use burrow_ratelimit::RateLimiter;
use burrow_shortener::Shortener;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    limiter: Arc<RateLimiter>,
    domain: String,
    trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        limiter: Arc<RateLimiter>,
        domain: impl Into<String>,
    ) -> Self {
        let domain: String = domain.into();
        Self {
            shortener,
            limiter,
            domain: domain.trim_end_matches('/').to_string(),
            trust_forwarded_for: false,
        }
    }

    /// Keys rate limiting on the `X-Forwarded-For` header instead of the
    /// peer address. Only safe behind a proxy that overwrites the header.
    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn trust_forwarded_for(&self) -> bool {
        self.trust_forwarded_for
    }

    /// Public base URL, without a trailing slash.
    pub fn domain(&self) -> &str {
        &self.domain
    }
}
