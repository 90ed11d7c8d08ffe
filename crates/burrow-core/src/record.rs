use crate::shortcode::ShortCode;
use jiff::Timestamp;

/// A stored URL record: one shortened link.
///
/// Records are immutable once created. An empty password is normalized to
/// `None`, so a protected record always carries a non-empty secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    original_url: String,
    short_code: ShortCode,
    expire_at: Option<Timestamp>,
    password: Option<String>,
}

/// How the HTTP layer should redirect to a resolved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// The link never expires.
    Permanent,
    /// The link carries an expiry and may disappear later.
    Temporary,
}

impl UrlRecord {
    pub fn new(short_code: ShortCode, original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            short_code,
            expire_at: None,
            password: None,
        }
    }

    pub fn with_expiry(mut self, expire_at: Option<Timestamp>) -> Self {
        self.expire_at = expire_at;
        self
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password.filter(|p| !p.is_empty());
        self
    }

    /// The original URL that was shortened.
    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn short_code(&self) -> &ShortCode {
        &self.short_code
    }

    /// When the record expires, if ever.
    pub fn expire_at(&self) -> Option<Timestamp> {
        self.expire_at
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn has_expiry(&self) -> bool {
        self.expire_at.is_some()
    }

    pub fn is_protected(&self) -> bool {
        self.password.is_some()
    }

    /// A record is expired from the instant `expire_at` is reached.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }

    pub fn redirect_kind(&self) -> RedirectKind {
        if self.has_expiry() {
            RedirectKind::Temporary
        } else {
            RedirectKind::Permanent
        }
    }

    /// Checks a presented credential. Unprotected records accept anything.
    pub fn verify_password(&self, presented: Option<&str>) -> bool {
        match self.password.as_deref() {
            None => true,
            Some(expected) => presented == Some(expected),
        }
    }
}
