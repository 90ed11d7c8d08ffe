use crate::config::{ShortenerConfig, ACCEPTED_SCHEMES};
use async_trait::async_trait;
use burrow_core::{
    Clock, Repository, ShortCode, ShortenOptions, Shortener, ShortenerError, StorageError,
    SystemClock, UrlRecord,
};
use burrow_generator::Generator;
use jiff::Timestamp;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use url::Url;

type Result<T> = std::result::Result<T, ShortenerError>;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL validation against the configured domain and length bound
/// - Short code assignment (custom, or generated with collision retry)
/// - Expiry computation and enforcement on restore
///
/// Expiry is judged by the service's own clock, independently of the
/// repository, so a record is never served past its deadline.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G, C = SystemClock> {
    repository: Arc<R>,
    generator: Arc<G>,
    clock: C,
    own_host: String,
    max_url_length: usize,
    max_attempts: usize,
}

impl<R: Repository, G: Generator> ShortenerService<R, G, SystemClock> {
    /// Creates a new `ShortenerService`.
    ///
    /// Fails with `InvalidUrl` when `config.domain` has no host. A bare host
    /// such as `burrow.sh` is accepted.
    pub fn new(repository: R, generator: G, config: ShortenerConfig) -> Result<Self> {
        let own_host = domain_host(&config.domain)?;
        Ok(Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            clock: SystemClock,
            own_host,
            max_url_length: config.max_url_length,
            max_attempts: config.max_attempts.max(1),
        })
    }
}

impl<R: Repository, G: Generator, C: Clock> ShortenerService<R, G, C> {
    /// Replaces the clock used for expiry.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ShortenerService<R, G, C2> {
        ShortenerService {
            repository: self.repository,
            generator: self.generator,
            clock,
            own_host: self.own_host,
            max_url_length: self.max_url_length,
            max_attempts: self.max_attempts,
        }
    }

    /// The backing repository, shared with anything that sweeps or persists it.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn validate_url(&self, url: &str) -> Result<()> {
        if url.len() > self.max_url_length {
            return Err(ShortenerError::UrlTooLong {
                len: url.len(),
                max: self.max_url_length,
            });
        }

        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        let parsed =
            Url::parse(url).map_err(|e| ShortenerError::InvalidUrl(format!("{url}: {e}")))?;
        let host = parsed.host_str().unwrap_or_default();

        if host.eq_ignore_ascii_case(&self.own_host) {
            return Err(ShortenerError::SameHost(host.to_string()));
        }

        if !ACCEPTED_SCHEMES.contains(&parsed.scheme()) {
            return Err(ShortenerError::UnsupportedScheme(
                parsed.scheme().to_string(),
            ));
        }

        if host.is_empty() {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a host: {url}"
            )));
        }

        Ok(())
    }

    fn expire_at(&self, options: &ShortenOptions) -> Option<Timestamp> {
        options
            .effective_ttl()
            .map(|ttl| self.clock.now().checked_add(ttl).unwrap_or(Timestamp::MAX))
    }

    async fn insert_generated(
        &self,
        long_url: &str,
        expire_at: Option<Timestamp>,
        password: Option<&str>,
    ) -> Result<UrlRecord> {
        for attempt in 1..=self.max_attempts {
            let code: ShortCode = self.generator.generate().into();
            let record = UrlRecord::new(code, long_url)
                .with_expiry(expire_at)
                .with_password(password.map(str::to_owned));

            match self.repository.insert(&record).await {
                Ok(()) => return Ok(record),
                Err(StorageError::Conflict(code)) => {
                    warn!(code = %code, attempt, "generated short code collided");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ShortenerError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[async_trait]
impl<R: Repository, G: Generator, C: Clock> Shortener for ShortenerService<R, G, C> {
    async fn shorten(&self, long_url: &str, options: ShortenOptions) -> Result<UrlRecord> {
        let long_url = long_url.trim();
        self.validate_url(long_url)?;

        let expire_at = self.expire_at(&options);
        let record = match options.custom_code() {
            Some(custom) => {
                let record = UrlRecord::new(ShortCode::new(custom)?, long_url)
                    .with_expiry(expire_at)
                    .with_password(options.password().map(str::to_owned));
                // Conflict surfaces as CodeTaken
                self.repository.insert(&record).await?;
                record
            }
            None => {
                self.insert_generated(long_url, expire_at, options.password())
                    .await?
            }
        };

        info!(
            code = %record.short_code(),
            url = record.original_url(),
            expire_at = ?record.expire_at(),
            protected = record.is_protected(),
            "short link created"
        );
        Ok(record)
    }

    async fn restore(&self, code: &str, password: Option<&str>) -> Result<UrlRecord> {
        trace!(code, "restoring short code");
        let not_found = || ShortenerError::NotFound(code.to_string());

        let Ok(short_code) = ShortCode::new(code) else {
            return Err(not_found());
        };
        let record = self
            .repository
            .get(&short_code)
            .await?
            .ok_or_else(not_found)?;

        if record.is_expired_at(self.clock.now()) {
            debug!(code, "record has expired");
            return Err(not_found());
        }

        if !record.verify_password(password) {
            debug!(code, "password rejected");
            return Err(ShortenerError::Unauthorized(code.to_string()));
        }

        Ok(record)
    }
}

fn domain_host(domain: &str) -> Result<String> {
    let parsed = match Url::parse(domain) {
        Ok(url) if url.has_host() => url,
        _ => Url::parse(&format!("http://{domain}"))
            .map_err(|e| ShortenerError::InvalidUrl(format!("domain {domain}: {e}")))?,
    };

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_ascii_lowercase()),
        _ => Err(ShortenerError::InvalidUrl(format!(
            "domain has no host: {domain}"
        ))),
    }
}
