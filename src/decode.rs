//! Checked little-endian reads over a container buffer.
//!
//! Every read is bounds-checked up front; a truncated buffer surfaces as
//! [`Error::LengthTooShort`] naming the field that could not be read. The
//! reader never consumes past an error.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    /// Byte offset of the next read.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left past the read position.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Skips `len` bytes already consumed by an outer parse step.
    pub fn skip(&mut self, len: usize, step: &'static str) -> Result<()> {
        self.take(len, step).map(|_| ())
    }

    fn take(&mut self, len: usize, step: &'static str) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).filter(|&end| end <= self.buf.len());
        match end {
            Some(end) => {
                let bytes = &self.buf[self.pos..end];
                self.pos = end;
                Ok(bytes)
            }
            None => Err(Error::LengthTooShort {
                step,
                actual: self.remaining(),
                expected: len,
            }),
        }
    }

    pub fn u8(&mut self, step: &'static str) -> Result<u8> {
        Ok(self.take(1, step)?[0])
    }

    pub fn u16(&mut self, step: &'static str) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2, step)?))
    }

    pub fn u32(&mut self, step: &'static str) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4, step)?))
    }

    pub fn u64(&mut self, step: &'static str) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8, step)?))
    }

    pub fn f32(&mut self, step: &'static str) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4, step)?))
    }

    pub fn bytes(&mut self, len: usize, step: &'static str) -> Result<&'a [u8]> {
        self.take(len, step)
    }
}

/// Reinterprets a little-endian byte region as a `u32` array. A trailing
/// partial word is dropped, matching the element-count division the format
/// performs when it views byte regions as word arrays.
pub(crate) fn u32_region(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(LittleEndian::read_u32)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_advance_in_order() {
        let buf = [0x01, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00];
        let mut r = Reader::new(&buf);
        assert_eq!(r.u8("a").unwrap(), 1);
        assert_eq!(r.u16("b").unwrap(), 2);
        assert_eq!(r.u32("c").unwrap(), 3);
        assert_eq!(r.position(), 7);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn short_read_names_the_step() {
        let mut r = Reader::new(&[0xFF; 2]);
        let err = r.u32("tick").unwrap_err();
        assert_eq!(
            err,
            Error::LengthTooShort {
                step: "tick",
                actual: 2,
                expected: 4,
            }
        );
        // Position is unchanged after a failed read.
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn u32_region_drops_partial_word() {
        let bytes = [1, 0, 0, 0, 2, 0, 0, 0, 9];
        assert_eq!(u32_region(&bytes), vec![1, 2]);
        assert_eq!(u32_region(&[]), Vec::<u32>::new());
    }
}
