use crate::error::ShortenerError;
use crate::record::UrlRecord;
use async_trait::async_trait;
use jiff::SignedDuration;
use typed_builder::TypedBuilder;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Request-scoped options for [`Shortener::shorten`].
///
/// Every field defaults to "not requested": an auto-generated code, no
/// expiry and no password. Empty strings mean the same as `None`.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ShortenOptions {
    /// Caller-chosen short code, used verbatim.
    #[builder(default, setter(strip_option, into))]
    pub custom_code: Option<String>,
    /// Lifetime of the link. Zero or negative means it never expires.
    #[builder(default, setter(strip_option))]
    pub ttl: Option<SignedDuration>,
    /// Secret required to resolve the link.
    #[builder(default, setter(strip_option, into))]
    pub password: Option<String>,
}

impl ShortenOptions {
    pub fn custom_code(&self) -> Option<&str> {
        self.custom_code.as_deref().filter(|c| !c.is_empty())
    }

    /// The TTL, if it actually limits the link's lifetime.
    pub fn effective_ttl(&self) -> Option<SignedDuration> {
        self.ttl.filter(|ttl| ttl.is_positive())
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL and returns the persisted record.
    async fn shorten(&self, long_url: &str, options: ShortenOptions) -> Result<UrlRecord>;

    /// Resolves a short code to its live record.
    ///
    /// `password` is the credential presented by the caller; it is only
    /// consulted when the record is protected.
    async fn restore(&self, code: &str, password: Option<&str>) -> Result<UrlRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_request_nothing() {
        let options = ShortenOptions::default();
        assert_eq!(options.custom_code(), None);
        assert_eq!(options.effective_ttl(), None);
        assert_eq!(options.password(), None);
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let options = ShortenOptions::builder()
            .custom_code("")
            .password("")
            .build();
        assert_eq!(options.custom_code(), None);
        assert_eq!(options.password(), None);
    }

    #[test]
    fn non_positive_ttl_never_expires() {
        let negative = ShortenOptions::builder()
            .ttl(SignedDuration::from_secs(-1))
            .build();
        let zero = ShortenOptions::builder().ttl(SignedDuration::ZERO).build();
        let positive = ShortenOptions::builder()
            .ttl(SignedDuration::from_secs(1))
            .build();

        assert_eq!(negative.effective_ttl(), None);
        assert_eq!(zero.effective_ttl(), None);
        assert_eq!(positive.effective_ttl(), Some(SignedDuration::from_secs(1)));
    }
}
