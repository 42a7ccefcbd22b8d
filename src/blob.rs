//! Blob addressing: `(offset, length)` pairs in a container header that
//! point at variable-length payloads stored later in the same buffer.
//!
//! Offsets are absolute within the container's own buffer. A nested child is
//! always a complete standalone container, so its internal offsets are
//! relative to its own slice: the parent hands the child decoder exactly
//! the declared byte range and recursion takes care of the rest.
//!
//! Tables are written in encode order. Decoders require every declared range
//! to lie inside the buffer but impose no ordering between entries.

use crate::container::{CodecConfig, Container};
use crate::decode::Reader;
use crate::encode::Writer;
use crate::error::{Error, Result};

/// One blob table entry: where a payload lives and how long it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobRange {
    pub offset: u32,
    pub length: u32,
}

impl BlobRange {
    pub fn new(offset: u32, length: u32) -> Self {
        BlobRange { offset, length }
    }

    /// A zero length marks an absent optional child on the wire.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub(crate) fn read(r: &mut Reader, step: &'static str) -> Result<Self> {
        let offset = r.u32(step)?;
        let length = r.u32(step)?;
        Ok(BlobRange { offset, length })
    }

    pub(crate) fn write(&self, w: &mut Writer) {
        w.u32(self.offset);
        w.u32(self.length);
    }

    /// Slices the addressed bytes out of the container buffer.
    pub(crate) fn slice<'a>(&self, buf: &'a [u8]) -> Result<&'a [u8]> {
        let start = self.offset as usize;
        let end = start.checked_add(self.length as usize);
        match end.and_then(|end| buf.get(start..end)) {
            Some(bytes) => Ok(bytes),
            None => Err(Error::OutOfRangeBlobReference {
                offset: self.offset,
                length: self.length,
                available: buf.len(),
            }),
        }
    }
}

/// Reads a counted table of `(offset, length)` pairs. The declared count is
/// checked against the remaining buffer before any pair is read, so a bogus
/// count fails fast instead of producing a huge short-read loop.
pub(crate) fn read_table(r: &mut Reader, step: &'static str) -> Result<Vec<BlobRange>> {
    let declared = r.u32(step)?;
    let available = (r.remaining() / 8) as u32;
    if declared > available {
        return Err(Error::InconsistentBlobCount {
            declared,
            available,
        });
    }
    (0..declared).map(|_| BlobRange::read(r, step)).collect()
}

/// Writes the count followed by every pair.
pub(crate) fn write_table(w: &mut Writer, ranges: &[BlobRange]) {
    w.u32(ranges.len() as u32);
    for range in ranges {
        range.write(w);
    }
}

/// Decodes every addressed child range as a standalone container.
pub(crate) fn decode_children<T: Container>(
    buf: &[u8],
    ranges: &[BlobRange],
    config: CodecConfig,
) -> Result<Vec<T>> {
    ranges
        .iter()
        .map(|range| Ok(T::decode_with(range.slice(buf)?, config)?.0))
        .collect()
}

/// Decodes a single optional child. Zero length means absent, so it is never
/// handed to the child decoder, which would reject it for lacking a magic.
pub(crate) fn decode_optional<T: Container>(
    buf: &[u8],
    range: BlobRange,
    config: CodecConfig,
) -> Result<Option<T>> {
    if range.is_empty() {
        return Ok(None);
    }
    Ok(Some(T::decode_with(range.slice(buf)?, config)?.0))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slice_checks_bounds() {
        let buf = [0u8; 16];
        assert_eq!(BlobRange::new(4, 8).slice(&buf).unwrap().len(), 8);
        assert_eq!(BlobRange::new(16, 0).slice(&buf).unwrap().len(), 0);
        let err = BlobRange::new(12, 8).slice(&buf).unwrap_err();
        assert_eq!(
            err,
            Error::OutOfRangeBlobReference {
                offset: 12,
                length: 8,
                available: 16,
            }
        );
        // Offset + length overflowing u32 arithmetic must not wrap.
        assert!(BlobRange::new(u32::MAX, u32::MAX).slice(&buf).is_err());
    }

    #[test]
    fn bogus_count_fails_fast() {
        // Count claims 0x1000 entries, buffer holds none.
        let buf = 0x1000u32.to_le_bytes();
        let mut r = Reader::new(&buf);
        let err = read_table(&mut r, "table").unwrap_err();
        assert_eq!(
            err,
            Error::InconsistentBlobCount {
                declared: 0x1000,
                available: 0,
            }
        );
    }

    #[test]
    fn table_roundtrip() {
        let ranges = vec![
            BlobRange::new(100, 0),
            BlobRange::new(100, 37),
            BlobRange::new(140, 4),
        ];
        let mut w = Writer::with_len(4 + ranges.len() * 8);
        write_table(&mut w, &ranges);
        let buf = w.finish();
        let mut r = Reader::new(&buf);
        assert_eq!(read_table(&mut r, "table").unwrap(), ranges);
    }
}
