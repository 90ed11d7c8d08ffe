use thiserror::Error;

pub type Result<T> = std::result::Result<T, RateLimitError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    #[error("rate limit exceeded for client {0}")]
    RateExceeded(String),
    #[error("invalid rate limiter config: {0}")]
    InvalidConfig(String),
}
