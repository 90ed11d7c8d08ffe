use crate::error::Result;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the live record for a given short code.
    /// Returns `None` if the code does not exist or its record has expired.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Checks whether a live record holds the short code.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record under its short code.
    ///
    /// The check and the insert are one atomic step: if a live record already
    /// holds the code this returns `Err(Conflict)`. An expired record is
    /// replaced.
    async fn insert(&self, record: &UrlRecord) -> Result<()>;

    /// Deletes the record for a given short code.
    /// Returns `true` if a record was removed.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;

    /// Eagerly removes every expired record, returning how many were dropped.
    async fn purge_expired(&self) -> Result<usize>;
}
