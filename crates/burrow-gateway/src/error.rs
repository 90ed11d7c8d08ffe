use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_ratelimit::RateLimitError;
use burrow_shortener::ShortenerError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
    #[error("invalid ttl {value:?}: {reason}")]
    InvalidTtl { value: String, reason: String },
    #[error("header {0} is not valid text")]
    InvalidHeader(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Shortener(e) => match e {
                ShortenerError::InvalidUrl(_)
                | ShortenerError::SameHost(_)
                | ShortenerError::UnsupportedScheme(_)
                | ShortenerError::UrlTooLong { .. }
                | ShortenerError::InvalidShortCode(_) => StatusCode::BAD_REQUEST,
                ShortenerError::CodeTaken(_) => StatusCode::CONFLICT,
                ShortenerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::GenerationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
                ShortenerError::CorruptRecord(_) | ShortenerError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::RateLimit(RateLimitError::RateExceeded(_)) => StatusCode::TOO_MANY_REQUESTS,
            AppError::RateLimit(RateLimitError::InvalidConfig(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InvalidTtl { .. } | AppError::InvalidHeader(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Shortener(e) => match e {
                ShortenerError::InvalidUrl(_) => "invalid_url",
                ShortenerError::SameHost(_) => "same_host",
                ShortenerError::UnsupportedScheme(_) => "unsupported_scheme",
                ShortenerError::UrlTooLong { .. } => "url_too_long",
                ShortenerError::InvalidShortCode(_) => "invalid_short_code",
                ShortenerError::CodeTaken(_) => "code_taken",
                ShortenerError::Unauthorized(_) => "unauthorized",
                ShortenerError::NotFound(_) => "not_found",
                ShortenerError::GenerationExhausted { .. } => "generation_exhausted",
                ShortenerError::CorruptRecord(_) | ShortenerError::Storage(_) => "internal_error",
            },
            AppError::RateLimit(RateLimitError::RateExceeded(_)) => "rate_exceeded",
            AppError::RateLimit(RateLimitError::InvalidConfig(_)) => "internal_error",
            AppError::InvalidTtl { .. } => "invalid_ttl",
            AppError::InvalidHeader(_) => "invalid_header",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: self.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
