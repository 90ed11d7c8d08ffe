use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_URL_LENGTH: usize = 1000;
pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

/// URL schemes a link may target.
pub const ACCEPTED_SCHEMES: &[&str] = &["http", "https", "ftp", "tcp"];

/// Settings for [`ShortenerService`](crate::ShortenerService).
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerConfig {
    /// Public base URL of this service, e.g. `https://burrow.sh`.
    ///
    /// Links pointing at this host are refused so a short link can never
    /// redirect to another short link on the same service.
    #[builder(setter(into))]
    pub domain: String,
    /// Longest accepted input URL, in bytes.
    #[builder(default = DEFAULT_MAX_URL_LENGTH)]
    pub max_url_length: usize,
    /// How many generated codes to try before giving up on collisions.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}
