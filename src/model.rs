//! Material model container: one voxel mesh variant with its palette,
//! per-voxel material overlay, and icon thumbnail.

use crate::blob::BlobRange;
use crate::container::{CodecConfig, Container};
use crate::decode::Reader;
use crate::encode::{Layout, Writer};
use crate::envelope::Envelope;
use crate::error::Result;
use crate::magic;

/// A voxel mesh variant of a material.
///
/// The four payload regions use the same `(offset, length)` addressing as a
/// blob table, but the count is fixed by the type so no count is stored.
/// Palette and material overlay are optional; voxel data and icon may be
/// legitimately empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub envelope: Envelope,
    /// Cubic edge resolution of the voxel grid.
    pub resolution: u8,
    /// Voxel occupancy/index data.
    pub data: Vec<u8>,
    /// Optional color palette.
    pub palette: Option<Vec<u8>>,
    /// Optional per-voxel material-index overlay.
    pub materials: Option<Vec<u8>>,
    /// Icon thumbnail shown by editors.
    pub icon: Vec<u8>,
}

impl Model {
    fn regions(&self) -> [&[u8]; 4] {
        [
            &self.data,
            self.palette.as_deref().unwrap_or(&[]),
            self.materials.as_deref().unwrap_or(&[]),
            &self.icon,
        ]
    }
}

impl Container for Model {
    const MAGIC: [u8; 4] = magic::MODEL;

    fn encode(&self) -> Vec<u8> {
        let regions = self.regions();
        let mut layout = Layout::new();
        layout.field(self.envelope.encoded_len());
        layout.field(1); // resolution
        layout.field(4 * 8); // four pairs
        let ranges =
            regions.map(|bytes| BlobRange::new(layout.region(bytes.len()), bytes.len() as u32));

        let mut w = Writer::with_len(layout.total());
        self.envelope.write(&mut w, Self::MAGIC);
        w.u8(self.resolution);
        for range in &ranges {
            range.write(&mut w);
        }
        for bytes in regions {
            w.bytes(bytes);
        }
        w.finish()
    }

    fn decode_with(buf: &[u8], _config: CodecConfig) -> Result<(Self, usize)> {
        let (envelope, header_len) = Envelope::decode(buf, Self::MAGIC)?;
        let mut r = Reader::new(buf);
        r.skip(header_len, "envelope")?;
        let resolution = r.u8("resolution")?;
        let data = BlobRange::read(&mut r, "data pair")?;
        let palette = BlobRange::read(&mut r, "palette pair")?;
        let materials = BlobRange::read(&mut r, "materials pair")?;
        let icon = BlobRange::read(&mut r, "icon pair")?;

        let consumed = [data, palette, materials, icon]
            .iter()
            .map(|range| range.offset as usize + range.length as usize)
            .fold(r.position(), usize::max);
        let model = Model {
            envelope,
            resolution,
            data: data.slice(buf)?.to_vec(),
            palette: (!palette.is_empty()).then(|| palette.slice(buf)).transpose()?.map(<[u8]>::to_vec),
            materials: (!materials.is_empty())
                .then(|| materials.slice(buf))
                .transpose()?
                .map(<[u8]>::to_vec),
            icon: icon.slice(buf)?.to_vec(),
        };
        Ok((model, consumed))
    }
}
