//! Material container: physical properties, a reference to the world the
//! material was authored from, an optional frozen snapshot of that world's
//! logic module, and the material's voxel models.

use crate::blob::{self, BlobRange};
use crate::container::{CodecConfig, Container};
use crate::decode::Reader;
use crate::encode::{Layout, Writer};
use crate::envelope::Envelope;
use crate::error::Result;
use crate::hash::WorldHash;
use crate::magic;
use crate::model::Model;
use crate::module::Module;

/// A voxel material.
///
/// The decoder performs no range validation on the property fields beyond
/// their wire width; the encoder truncates wider values to the wire field.
/// The snapshot module captures the referenced world's logic at authoring
/// time so consumers can use the material without resolving `world_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Material {
    pub envelope: Envelope,
    /// Material id (0–1024).
    pub id: u16,
    /// Density (0–15).
    pub density: u8,
    /// Conductivity (0–15).
    pub conductivity: u8,
    /// Id of the referenced world.
    pub world_id: u64,
    /// Content hash of the referenced world.
    pub world_hash: WorldHash,
    /// Frozen snapshot of the referenced world's module.
    pub module: Option<Module>,
    /// Voxel models of the material.
    pub models: Vec<Model>,
}

impl Container for Material {
    const MAGIC: [u8; 4] = magic::MATERIAL;

    fn encode(&self) -> Vec<u8> {
        // Children first: each nested container is encoded standalone, so
        // every sibling length is known before the parent layout is fixed.
        let module_data = self.module.as_ref().map(Module::encode).unwrap_or_default();
        let model_data: Vec<Vec<u8>> = self.models.iter().map(Model::encode).collect();

        let mut layout = Layout::new();
        layout.field(self.envelope.encoded_len());
        layout.field(2 + 1 + 1); // id, density, conductivity
        layout.field(8); // world id
        layout.field(crate::hash::HASH_BYTES);
        layout.field(8); // module pair
        layout.field(4 + model_data.len() * 8);
        let module_range = BlobRange::new(
            layout.region(module_data.len()),
            module_data.len() as u32,
        );
        let model_ranges: Vec<BlobRange> = model_data
            .iter()
            .map(|data| BlobRange::new(layout.region(data.len()), data.len() as u32))
            .collect();

        let mut w = Writer::with_len(layout.total());
        self.envelope.write(&mut w, Self::MAGIC);
        w.u16(self.id);
        w.u8(self.density);
        w.u8(self.conductivity);
        w.u64(self.world_id);
        w.bytes(self.world_hash.as_ref());
        module_range.write(&mut w);
        blob::write_table(&mut w, &model_ranges);
        w.bytes(&module_data);
        for data in &model_data {
            w.bytes(data);
        }
        w.finish()
    }

    fn decode_with(buf: &[u8], config: CodecConfig) -> Result<(Self, usize)> {
        let (envelope, header_len) = Envelope::decode(buf, Self::MAGIC)?;
        let mut r = Reader::new(buf);
        r.skip(header_len, "envelope")?;
        let id = r.u16("id")?;
        let density = r.u8("density")?;
        let conductivity = r.u8("conductivity")?;
        let world_id = r.u64("world id")?;
        let digest: [u8; crate::hash::HASH_BYTES] = r
            .bytes(crate::hash::HASH_BYTES, "world hash")?
            .try_into()
            .expect("fixed-size read");
        let module_range = BlobRange::read(&mut r, "module pair")?;
        let model_table = blob::read_table(&mut r, "model table")?;

        let consumed = model_table
            .iter()
            .chain(std::iter::once(&module_range))
            .map(|range| range.offset as usize + range.length as usize)
            .fold(r.position(), usize::max);
        let material = Material {
            envelope,
            id,
            density,
            conductivity,
            world_id,
            world_hash: WorldHash::new(digest),
            module: blob::decode_optional(buf, module_range, config)?,
            models: blob::decode_children(buf, &model_table, config)?,
        };
        Ok((material, consumed))
    }
}
