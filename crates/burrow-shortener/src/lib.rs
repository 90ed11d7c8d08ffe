//! URL shortener service implementation.
//!
//! [`ShortenerService`] is the production [`Shortener`]: it validates
//! incoming URLs, assigns custom or generated codes, computes expiry and
//! enforces it again on lookup. Core types are re-exported from `burrow_core`.

pub mod config;
pub mod service;

pub use burrow_core::{ShortenOptions, Shortener, ShortenerError};
pub use config::ShortenerConfig;
pub use service::ShortenerService;
