//! Fixed-layout binary encoding of [`UrlRecord`].
//!
//! ```text
//! offset  width  field
//! 0       1      flags (bit 0: has expiry, bit 1: has password)
//! 1       8      expiry seconds since the Unix epoch, i64 BE (0 if absent)
//! 9       4      expiry sub-second nanoseconds, i32 BE (0 if absent)
//! 13      2+n    short code, u16 BE length + UTF-8 bytes
//! ..      4+n    original url, u32 BE length + UTF-8 bytes
//! ..      4+n    password, u32 BE length + UTF-8 bytes (empty if absent)
//! ```
//!
//! The expiry flag is the only "absent" marker: a zero timestamp is a valid
//! instant and is never read as "no expiry".

use crate::error::CodecError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use jiff::Timestamp;

const FLAG_EXPIRY: u8 = 0b0000_0001;
const FLAG_PASSWORD: u8 = 0b0000_0010;
const KNOWN_FLAGS: u8 = FLAG_EXPIRY | FLAG_PASSWORD;

/// Size of the fixed-width region: flags + seconds + nanoseconds.
pub const FIXED_LEN: usize = 1 + 8 + 4;

type Result<T> = std::result::Result<T, CodecError>;

impl UrlRecord {
    /// Encodes the record. Identical records always encode to identical bytes.
    pub fn encode(&self) -> Vec<u8> {
        let code = self.short_code().as_str().as_bytes();
        let url = self.original_url().as_bytes();
        let password = self.password().unwrap_or_default().as_bytes();

        let mut buf =
            Vec::with_capacity(FIXED_LEN + 2 + code.len() + 4 + url.len() + 4 + password.len());

        let mut flags = 0;
        if self.has_expiry() {
            flags |= FLAG_EXPIRY;
        }
        if self.is_protected() {
            flags |= FLAG_PASSWORD;
        }
        buf.push(flags);

        let (seconds, nanos) = self
            .expire_at()
            .map(|ts| (ts.as_second(), ts.subsec_nanosecond()))
            .unwrap_or((0, 0));
        buf.extend_from_slice(&seconds.to_be_bytes());
        buf.extend_from_slice(&nanos.to_be_bytes());

        // Short codes are at most 64 bytes, so the u16 prefix cannot truncate.
        buf.extend_from_slice(&(code.len() as u16).to_be_bytes());
        buf.extend_from_slice(code);
        put_u32_prefixed(&mut buf, url);
        put_u32_prefixed(&mut buf, password);

        buf
    }

    /// Decodes a record produced by [`UrlRecord::encode`].
    ///
    /// Every length prefix is checked against the remaining input before
    /// anything is allocated, so hostile input costs at most its own size.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FIXED_LEN {
            return Err(corrupt(format!(
                "need at least {FIXED_LEN} bytes for the fixed region, got {}",
                bytes.len()
            )));
        }

        let mut reader = Reader::new(bytes);
        let flags = reader.u8()?;
        if flags & !KNOWN_FLAGS != 0 {
            return Err(corrupt(format!("unknown flag bits {flags:#010b}")));
        }

        let seconds = i64::from_be_bytes(reader.array()?);
        let nanos = i32::from_be_bytes(reader.array()?);
        let expire_at = if flags & FLAG_EXPIRY != 0 {
            let ts = Timestamp::new(seconds, nanos)
                .map_err(|e| corrupt(format!("expiry out of range: {e}")))?;
            Some(ts)
        } else if seconds != 0 || nanos != 0 {
            return Err(corrupt("expiry bytes set without the expiry flag"));
        } else {
            None
        };

        let code_len = u16::from_be_bytes(reader.array()?) as usize;
        let code = reader.utf8(code_len, "short code")?;
        let code = ShortCode::new(code).map_err(|e| corrupt(e.to_string()))?;

        let url_len = u32::from_be_bytes(reader.array()?) as usize;
        let url = reader.utf8(url_len, "original url")?;

        let password_len = u32::from_be_bytes(reader.array()?) as usize;
        let password = reader.utf8(password_len, "password")?;
        let password = match (flags & FLAG_PASSWORD != 0, password.is_empty()) {
            (true, false) => Some(password),
            (false, true) => None,
            (true, true) => return Err(corrupt("password flag set with an empty password")),
            (false, false) => return Err(corrupt("password bytes present without the flag")),
        };

        if reader.remaining() != 0 {
            return Err(corrupt(format!(
                "{} trailing bytes after the last field",
                reader.remaining()
            )));
        }

        Ok(UrlRecord::new(code, url)
            .with_expiry(expire_at)
            .with_password(password))
    }
}

fn put_u32_prefixed(buf: &mut Vec<u8>, field: &[u8]) {
    buf.extend_from_slice(&(field.len() as u32).to_be_bytes());
    buf.extend_from_slice(field);
}

fn corrupt(reason: impl Into<String>) -> CodecError {
    CodecError::Corrupt(reason.into())
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.buf.len() {
            return Err(corrupt(format!(
                "field of {len} bytes overruns the {} remaining",
                self.buf.len()
            )));
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn utf8(&mut self, len: usize, field: &str) -> Result<String> {
        let raw = self.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|e| corrupt(format!("{field} is not valid utf-8: {e}")))
    }
}
