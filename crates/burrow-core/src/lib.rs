//! Core types and traits for the Burrow URL shortener.
//!
//! This crate holds the record model and its binary codec, the short code
//! type, the [`Shortener`] and [`Repository`] contracts, and the [`Clock`]
//! seam used for expiry decisions.

pub mod clock;
pub mod codec;
pub mod error;
pub mod record;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CodecError, ShortenerError, StorageError};
pub use record::{RedirectKind, UrlRecord};
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
pub use shortener::{ShortenOptions, Shortener};
