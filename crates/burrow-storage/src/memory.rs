use async_trait::async_trait;
use burrow_core::error::Result;
use burrow_core::{
    Clock, ReadRepository, Repository, ShortCode, StorageError, SystemClock, UrlRecord,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, error, trace};

/// In-memory implementation of the Repository trait using DashMap.
///
/// Records are kept in their binary encoding, exactly as they would be
/// persisted, and decoded on every read. Expired records stay in the map
/// until they are overwritten or swept by [`Repository::purge_expired`];
/// reads treat them as absent.
///
/// DashMap shards its locks, so operations on different codes rarely
/// contend, and the entry API makes check-and-insert atomic per code.
#[derive(Debug)]
pub struct InMemoryRepository<C = SystemClock> {
    pub(crate) storage: DashMap<String, Vec<u8>>,
    pub(crate) clock: C,
}

impl InMemoryRepository<SystemClock> {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
            clock: SystemClock,
        }
    }
}

impl Default for InMemoryRepository<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryRepository<C> {
    /// Creates a repository that judges expiry by `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
        }
    }

    /// Number of physically stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Stores `bytes` under `code` as-is, bypassing the codec.
    #[cfg(any(test, feature = "test-util"))]
    pub fn insert_raw(&self, code: &str, bytes: Vec<u8>) {
        self.storage.insert(code.to_owned(), bytes);
    }

    /// Decodes every stored record that is still live.
    pub fn live_records(&self) -> Result<Vec<UrlRecord>> {
        let now = self.clock.now();
        let mut records = Vec::with_capacity(self.storage.len());
        for entry in self.storage.iter() {
            let record = decode(entry.key(), entry.value())?;
            if !record.is_expired_at(now) {
                records.push(record);
            }
        }
        Ok(records)
    }

    pub(crate) fn insert_now(&self, record: &UrlRecord) -> Result<()> {
        let code = record.short_code();
        let bytes = record.encode();

        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(mut occupied) => {
                let existing = decode(code.as_str(), occupied.get())?;
                if !existing.is_expired_at(self.clock.now()) {
                    return Err(StorageError::Conflict(code.to_string()));
                }
                trace!(code = %code, "replacing expired record");
                occupied.insert(bytes);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(bytes);
            }
        }

        Ok(())
    }
}

fn decode(code: &str, bytes: &[u8]) -> Result<UrlRecord> {
    UrlRecord::decode(bytes).map_err(|e| {
        error!(code = code, error = %e, "stored record failed to decode");
        StorageError::from(e)
    })
}

#[async_trait]
impl<C: Clock> ReadRepository for InMemoryRepository<C> {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let key = code.as_str();

        let record = match self.storage.get(key) {
            Some(bytes) => decode(key, bytes.value())?,
            None => {
                trace!(code = %code, "short code not stored");
                return Ok(None);
            }
        };

        if record.is_expired_at(self.clock.now()) {
            debug!(code = %code, "record has expired");
            return Ok(None);
        }

        Ok(Some(record))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.get(code).await?.is_some())
    }
}

#[async_trait]
impl<C: Clock> Repository for InMemoryRepository<C> {
    async fn insert(&self, record: &UrlRecord) -> Result<()> {
        self.insert_now(record)
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.remove(code.as_str()).is_some())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut purged = 0;

        self.storage.retain(|code, bytes| match UrlRecord::decode(bytes) {
            Ok(record) if record.is_expired_at(now) => {
                purged += 1;
                false
            }
            Ok(_) => true,
            Err(e) => {
                error!(code = %code, error = %e, "keeping undecodable record for inspection");
                true
            }
        });

        if purged > 0 {
            debug!(purged, "purged expired records");
        }
        Ok(purged)
    }
}
