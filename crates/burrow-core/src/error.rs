use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Raised when an encoded [`UrlRecord`](crate::UrlRecord) cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("stored data is corrupt: {0}")]
    Corrupt(#[from] CodecError),
    #[error("storage io failed: {0}")]
    Io(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("url points back at this service: {0}")]
    SameHost(String),
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
    #[error("url too long: {len} bytes exceeds the limit of {max}")]
    UrlTooLong { len: usize, max: usize },
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("short code already taken: {0}")]
    CodeTaken(String),
    #[error("no free short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("password required for short code: {0}")]
    Unauthorized(String),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for ShortenerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(code) => ShortenerError::CodeTaken(code),
            StorageError::Corrupt(CodecError::Corrupt(reason)) => {
                ShortenerError::CorruptRecord(reason)
            }
            other => ShortenerError::Storage(other.to_string()),
        }
    }
}
