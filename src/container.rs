//! The shared container interface and the codec configuration.

use crate::error::Result;
use crate::magic;

/// Selects how a module's function-table blobs are interpreted.
///
/// The two forms are structurally identical on the wire (a counted blob
/// table), so a decoder cannot distinguish them from the bytes alone.
/// Reading a file written in the other form produces structurally valid but
/// semantically wrong results, which is why the selection is an explicit
/// configuration rather than a guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FunctionTableForm {
    /// One binary-decision-diagram blob per output bit.
    #[default]
    Bdd,
    /// A single flat truth-table blob covering all input combinations.
    TruthTable,
}

/// Decode-side configuration, threaded through nested containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecConfig {
    /// Function-table interpretation for every module encountered.
    pub function_table: FunctionTableForm,
}

/// A complete container: a standalone envelope plus payload that encodes to
/// bytes and decodes from them.
///
/// Nesting builds on this interface. A parent never embeds a header-less
/// fragment; each addressed child range holds a full standalone container,
/// so the blob plumbing is generic over any implementor.
pub trait Container: Sized {
    /// The four magic bytes identifying this container type.
    const MAGIC: [u8; 4];

    /// Encodes into a single contiguous buffer, sized exactly before any
    /// byte is written.
    fn encode(&self) -> Vec<u8>;

    /// Decodes from a buffer, returning the value and the number of bytes
    /// consumed so callers can locate a following sibling in a larger
    /// stream.
    fn decode_with(buf: &[u8], config: CodecConfig) -> Result<(Self, usize)>;

    /// Decodes with the default configuration.
    fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        Self::decode_with(buf, CodecConfig::default())
    }

    /// Indicates whether the buffer starts with this container's magic.
    fn is(buf: &[u8]) -> bool {
        magic::type_of(buf) == Some(Self::MAGIC)
    }
}
