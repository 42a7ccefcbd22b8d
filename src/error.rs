use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while decoding a container buffer.
///
/// Every error is fatal to the decode call that raised it; a structural
/// violation in a nested child aborts the ancestor decode as well. Encoding
/// has no error path: field values wider than their wire field are truncated
/// to the declared width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The first two bytes of the buffer are not the family magic. The buffer
    /// is not an instance of this format at all.
    InvalidFamilyMagic { expected: [u8; 2], actual: [u8; 2] },
    /// The buffer belongs to the format family, but its four magic bytes
    /// identify a different container type than the caller expected.
    InvalidTypeMagic { expected: [u8; 4], actual: [u8; 4] },
    /// A blob table entry addresses bytes outside the container buffer.
    OutOfRangeBlobReference {
        offset: u32,
        length: u32,
        available: usize,
    },
    /// A blob table declares more entries than the remaining buffer can hold,
    /// or a fixed-count table carries the wrong number of entries.
    InconsistentBlobCount { declared: u32, available: u32 },
    /// The buffer ended in the middle of a fixed-size field.
    LengthTooShort {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
}

fn magic_str(magic: &[u8]) -> String {
    magic.iter().map(|&b| char::from(b)).collect()
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidFamilyMagic { expected, actual } => write!(
                f,
                "Invalid family magic: expected '{}', got '{}'",
                magic_str(&expected),
                magic_str(&actual)
            ),
            Error::InvalidTypeMagic { expected, actual } => write!(
                f,
                "Invalid type magic: expected '{}', got '{}'",
                magic_str(&expected),
                magic_str(&actual)
            ),
            Error::OutOfRangeBlobReference {
                offset,
                length,
                available,
            } => write!(
                f,
                "Blob reference at offset {} with length {} exceeds buffer of {} bytes",
                offset, length, available
            ),
            Error::InconsistentBlobCount {
                declared,
                available,
            } => write!(
                f,
                "Blob table declares {} entries but only {} fit the buffer",
                declared, available
            ),
            Error::LengthTooShort {
                step,
                actual,
                expected,
            } => write!(
                f,
                "Expected data length {}, but got {} on step [{}]",
                expected, actual, step
            ),
        }
    }
}

impl std::error::Error for Error {}
