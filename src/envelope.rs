//! The common header prefixing every container: type magic, four raw version
//! bytes, and an optional name and preview image.

use crate::decode::Reader;
use crate::encode::{Layout, Writer};
use crate::error::Result;
use crate::magic;

/// Header shared by every container type.
///
/// The version bytes are by convention major/minor/patch/build, but the
/// format never interprets them; only the type magic gates decoding. Name
/// and preview are absent when empty on the wire; the zero-length
/// convention stays in the codec, the API always uses `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    /// Raw version bytes, never interpreted for compatibility decisions.
    pub version: [u8; 4],
    /// Optional display name. Encoded bytes are truncated to 7 bits each.
    pub name: Option<String>,
    /// Optional preview image blob, opaque to the codec.
    pub preview: Option<Vec<u8>>,
}

impl Envelope {
    /// Total encoded size of the header, computed before any byte is written.
    pub(crate) fn encoded_len(&self) -> usize {
        let mut layout = Layout::new();
        layout.field(4); // magic
        layout.field(4); // version
        layout.field(4 + self.name.as_ref().map_or(0, |n| n.len()));
        layout.field(4 + self.preview.as_ref().map_or(0, |p| p.len()));
        layout.total()
    }

    pub(crate) fn write(&self, w: &mut Writer, magic: [u8; 4]) {
        w.bytes(&magic);
        w.bytes(&self.version);
        match &self.name {
            Some(name) => {
                w.u32(name.len() as u32);
                for b in name.bytes() {
                    w.u8(b & 0x7F);
                }
            }
            None => w.u32(0),
        }
        match &self.preview {
            Some(preview) => {
                w.u32(preview.len() as u32);
                w.bytes(preview);
            }
            None => w.u32(0),
        }
    }

    /// Encodes the header as a standalone byte string.
    pub fn encode(&self, magic: [u8; 4]) -> Vec<u8> {
        let mut w = Writer::with_len(self.encoded_len());
        self.write(&mut w, magic);
        w.finish()
    }

    /// Decodes the header, validating the magic against `expected`. Returns
    /// the envelope and the number of bytes it occupied, which is where the
    /// container's own fields begin.
    pub fn decode(buf: &[u8], expected: [u8; 4]) -> Result<(Self, usize)> {
        magic::expect(buf, expected)?;
        let mut r = Reader::new(buf);
        r.skip(4, "magic")?;
        let mut version = [0u8; 4];
        for v in version.iter_mut() {
            *v = r.u8("version")?;
        }
        let name_len = r.u32("name length")? as usize;
        // Bytes map 1:1 to chars so that foreign writers using high bytes
        // still parse; our own encoder only ever emits 7-bit bytes.
        let name: String = r
            .bytes(name_len, "name")?
            .iter()
            .map(|&b| char::from(b))
            .collect();
        let preview_len = r.u32("preview length")? as usize;
        let preview = r.bytes(preview_len, "preview")?;
        let envelope = Envelope {
            version,
            name: (!name.is_empty()).then_some(name),
            preview: (!preview.is_empty()).then(|| preview.to_vec()),
        };
        Ok((envelope, r.position()))
    }
}
