//! Snapshot file for [`InMemoryRepository`].
//!
//! A snapshot is the 4-byte magic `BRRW`, a one-byte format version, and then
//! one frame per live record: a `u32` big-endian length followed by the
//! record's binary encoding. Files are written to a sibling temp path and
//! renamed into place.

use crate::memory::InMemoryRepository;
use burrow_core::error::Result;
use burrow_core::{Clock, CodecError, StorageError, UrlRecord};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

const MAGIC: &[u8; 4] = b"BRRW";
const VERSION: u8 = 1;
const HEADER_LEN: usize = MAGIC.len() + 1;

fn corrupt(reason: impl Into<String>) -> StorageError {
    StorageError::Corrupt(CodecError::Corrupt(reason.into()))
}

/// Serializes records into the snapshot format.
pub fn encode(records: &[UrlRecord]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + records.len() * 64);
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    for record in records {
        let frame = record.encode();
        buf.extend_from_slice(&(frame.len() as u32).to_be_bytes());
        buf.extend_from_slice(&frame);
    }
    buf
}

/// Parses a snapshot, failing on the first malformed frame.
pub fn decode(bytes: &[u8]) -> Result<Vec<UrlRecord>> {
    if bytes.len() < HEADER_LEN || &bytes[..MAGIC.len()] != MAGIC {
        return Err(corrupt("missing snapshot header"));
    }
    if bytes[MAGIC.len()] != VERSION {
        return Err(corrupt(format!(
            "unsupported snapshot version {}",
            bytes[MAGIC.len()]
        )));
    }

    let mut rest = &bytes[HEADER_LEN..];
    let mut records = Vec::new();
    while !rest.is_empty() {
        let Some((len, tail)) = rest.split_first_chunk::<4>() else {
            return Err(corrupt("truncated frame length"));
        };
        let len = u32::from_be_bytes(*len) as usize;
        if len > tail.len() {
            return Err(corrupt(format!(
                "frame of {len} bytes overruns the {} remaining",
                tail.len()
            )));
        }
        let (frame, tail) = tail.split_at(len);
        records.push(UrlRecord::decode(frame)?);
        rest = tail;
    }

    Ok(records)
}

impl<C: Clock> InMemoryRepository<C> {
    /// Writes every live record to `path`. Returns how many were written.
    pub async fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let records = self.live_records()?;
        let bytes = encode(&records);

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        info!(path = %path.display(), records = records.len(), "snapshot saved");
        Ok(records.len())
    }

    /// Loads records from `path`, skipping any that have expired since the
    /// snapshot was taken. A missing file loads nothing.
    pub async fn load_snapshot(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot to load");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let now = self.clock.now();
        let mut loaded = 0;
        for record in decode(&bytes)? {
            if record.is_expired_at(now) {
                continue;
            }
            match self.insert_now(&record) {
                Ok(()) => loaded += 1,
                Err(StorageError::Conflict(code)) => {
                    warn!(code = %code, "snapshot record shadowed by a live record");
                }
                Err(e) => return Err(e),
            }
        }

        info!(path = %path.display(), records = loaded, "snapshot loaded");
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::{ManualClock, ReadRepository, Repository, ShortCode};
    use jiff::{SignedDuration, Timestamp};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = Timestamp::now().as_nanosecond();
        std::env::temp_dir().join(format!("burrow-{name}-{}-{nanos}.snap", std::process::id()))
    }

    fn record(c: &str) -> UrlRecord {
        UrlRecord::new(ShortCode::new_unchecked(c), format!("https://{c}.example.com"))
    }

    #[test]
    fn encode_decode_frames() {
        let records = vec![
            record("a"),
            record("b").with_password(Some("pw".to_string())),
            record("c").with_expiry(Some(Timestamp::UNIX_EPOCH)),
        ];
        assert_eq!(decode(&encode(&records)).unwrap(), records);
        assert!(decode(&encode(&[])).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_header_and_truncation() {
        assert!(decode(b"").is_err());
        assert!(decode(b"NOPE\x01").is_err());
        assert!(decode(b"BRRW\x02").is_err());

        let bytes = encode(&[record("a"), record("b")]);
        let boundary = HEADER_LEN + 4 + record("a").encode().len();
        for len in (HEADER_LEN + 1..bytes.len()).filter(|len| *len != boundary) {
            assert!(decode(&bytes[..len]).is_err(), "len {len}");
        }
        assert_eq!(decode(&bytes[..boundary]).unwrap(), vec![record("a")]);
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let clock = ManualClock::new(Timestamp::from_second(1_000_000).unwrap());
        let source = InMemoryRepository::with_clock(clock.clone());
        let expiring = record("soon").with_expiry(Some(clock.now() + SignedDuration::from_secs(60)));
        let later = record("later").with_expiry(Some(clock.now() + SignedDuration::from_hours(1)));
        source.insert(&record("never")).await.unwrap();
        source.insert(&expiring).await.unwrap();
        source.insert(&later).await.unwrap();

        let path = temp_path("round-trip");
        assert_eq!(source.save_snapshot(&path).await.unwrap(), 3);

        clock.advance(SignedDuration::from_secs(120));
        let target = InMemoryRepository::with_clock(clock.clone());
        assert_eq!(target.load_snapshot(&path).await.unwrap(), 2);

        assert_eq!(
            target.get(later.short_code()).await.unwrap(),
            Some(later.clone())
        );
        assert!(target.get(expiring.short_code()).await.unwrap().is_none());
        assert_eq!(target.len(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_snapshot_loads_nothing() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.load_snapshot(temp_path("missing")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_rejected() {
        let path = temp_path("corrupt");
        tokio::fs::write(&path, b"BRRW\x01\x00\x00\x00\x09short").await.unwrap();

        let repo = InMemoryRepository::new();
        let err = repo.load_snapshot(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
