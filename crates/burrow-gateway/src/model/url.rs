use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub original_url: String,
    #[serde(default)]
    pub custom_code: Option<String>,
    /// Lifetime such as `"1h30m"` or `"PT90M"`.
    #[serde(default)]
    pub ttl: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<Timestamp>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub pass: Option<String>,
}
