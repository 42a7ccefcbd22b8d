//! World container: the root entity. Holds the simulation header, camera
//! and post-processing state, an optional embedded logic module, the
//! material list, and the two double-buffered simulation grids.

use log::debug;

use crate::blob::{self, BlobRange};
use crate::container::{CodecConfig, Container};
use crate::decode::Reader;
use crate::encode::{Layout, Writer};
use crate::envelope::Envelope;
use crate::error::Result;
use crate::magic;
use crate::material::Material;
use crate::module::Module;

/// Rendering settings persisted with a world. Orthogonal to the container
/// core; the codec carries the block verbatim in declared field order.
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessing {
    pub margins: f32,
    pub exposure: f32,
    pub film_grain: f32,
    pub vignette: f32,
    pub saturation: f32,
    pub chromatic_aberration: f32,
    pub sun_intensity: f32,
    pub sun_color: [f32; 3],
    pub fog_intensity: f32,
    pub sky_intensity: f32,
    pub day_time: f32,
    pub sky_color: [f32; 3],
    pub bloom_intensity: f32,
    pub volumetric_light: bool,
    pub fxaa: bool,
    pub particles: bool,
    pub aperture: f32,
    pub backface_grid_intensity: f32,
    pub auto_focus_speed: f32,
}

impl Default for PostProcessing {
    fn default() -> Self {
        PostProcessing {
            margins: 0.0,
            exposure: 24.0,
            film_grain: 10.0,
            vignette: 10.0,
            saturation: 10.0,
            chromatic_aberration: 3.0,
            sun_intensity: 40.0,
            sun_color: [185.0, 185.0, 200.0],
            fog_intensity: 14.0,
            sky_intensity: 1.0,
            day_time: 0.0,
            sky_color: [80.0, 160.0, 255.0],
            bloom_intensity: 0.0,
            volumetric_light: false,
            fxaa: true,
            particles: false,
            aperture: 0.0,
            backface_grid_intensity: 0.25,
            auto_focus_speed: 50.0,
        }
    }
}

/// Encoded size of the post-processing block: 20 floats and 3 flag bytes.
const POST_PROCESSING_LEN: usize = 20 * 4 + 3;

impl PostProcessing {
    fn write(&self, w: &mut Writer) {
        w.f32(self.margins);
        w.f32(self.exposure);
        w.f32(self.film_grain);
        w.f32(self.vignette);
        w.f32(self.saturation);
        w.f32(self.chromatic_aberration);
        w.f32(self.sun_intensity);
        for c in self.sun_color {
            w.f32(c);
        }
        w.f32(self.fog_intensity);
        w.f32(self.sky_intensity);
        w.f32(self.day_time);
        for c in self.sky_color {
            w.f32(c);
        }
        w.f32(self.bloom_intensity);
        w.u8(self.volumetric_light as u8);
        w.u8(self.fxaa as u8);
        w.u8(self.particles as u8);
        w.f32(self.aperture);
        w.f32(self.backface_grid_intensity);
        w.f32(self.auto_focus_speed);
    }

    fn read(r: &mut Reader) -> Result<Self> {
        Ok(PostProcessing {
            margins: r.f32("pp margins")?,
            exposure: r.f32("pp exposure")?,
            film_grain: r.f32("pp film grain")?,
            vignette: r.f32("pp vignette")?,
            saturation: r.f32("pp saturation")?,
            chromatic_aberration: r.f32("pp chromatic aberration")?,
            sun_intensity: r.f32("pp sun intensity")?,
            sun_color: [
                r.f32("pp sun color")?,
                r.f32("pp sun color")?,
                r.f32("pp sun color")?,
            ],
            fog_intensity: r.f32("pp fog intensity")?,
            sky_intensity: r.f32("pp sky intensity")?,
            day_time: r.f32("pp day time")?,
            sky_color: [
                r.f32("pp sky color")?,
                r.f32("pp sky color")?,
                r.f32("pp sky color")?,
            ],
            bloom_intensity: r.f32("pp bloom intensity")?,
            volumetric_light: r.u8("pp volumetric light")? != 0,
            fxaa: r.u8("pp fxaa")? != 0,
            particles: r.u8("pp particles")? != 0,
            aperture: r.f32("pp aperture")?,
            backface_grid_intensity: r.f32("pp backface grid intensity")?,
            auto_focus_speed: r.f32("pp auto focus speed")?,
        })
    }
}

/// A double-buffered simulation grid region.
///
/// The wire records the region's total length once. Decoders split it with a
/// right shift by one, so an odd total loses its trailing byte from the two
/// halves. The raw region is kept here in full, so re-encoding a decoded
/// grid is byte-identical, and the `front`/`back` views reproduce the split
/// exactly as the format performs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridPair {
    data: Vec<u8>,
}

impl GridPair {
    /// Wraps a raw region holding both halves back-to-back.
    pub fn new(data: Vec<u8>) -> Self {
        GridPair { data }
    }

    /// Builds a region from two halves. The halves are laid out
    /// back-to-back; callers supply equal lengths, as the split on read is
    /// positional.
    pub fn from_halves(front: &[u8], back: &[u8]) -> Self {
        let mut data = Vec::with_capacity(front.len() + back.len());
        data.extend_from_slice(front);
        data.extend_from_slice(back);
        GridPair { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current-state half.
    pub fn front(&self) -> &[u8] {
        &self.data[..self.data.len() >> 1]
    }

    /// Next-state half.
    pub fn back(&self) -> &[u8] {
        let half = self.data.len() >> 1;
        &self.data[half..half * 2]
    }
}

/// A voxel world.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub envelope: Envelope,
    /// Main-grid resolution per axis.
    pub resolution: [u16; 3],
    /// Sub-grid resolution.
    pub sub_resolution: u8,
    /// Edge size of the sub-voxel atlas.
    pub sub_atlas_size: u8,
    /// Simulation block size of the main grid.
    pub block_size: u16,
    /// Material slot count.
    pub material_count: u16,
    /// Material animation slot count.
    pub material_animation_count: u8,
    /// Simulation ticks per second.
    pub tick_rate: u8,
    /// Current simulation tick.
    pub tick: u32,
    /// IO pin state.
    pub io_pin_state: bool,
    pub camera_rotation: [f32; 2],
    pub camera_translation: [f32; 3],
    pub post_processing: PostProcessing,
    /// Hand-selectable material ids.
    pub hand_material_ids: [u32; 8],
    /// Current index into the hand materials.
    pub hand_material_index: u32,
    /// Previous index into the hand materials.
    pub previous_hand_material_index: u32,
    /// Embedded logic module.
    pub module: Option<Module>,
    /// Materials of the world.
    pub materials: Vec<Material>,
    /// Double-buffered cell state.
    pub cell_data: GridPair,
    /// Double-buffered flow state.
    pub flow_data: GridPair,
}

impl Default for World {
    fn default() -> Self {
        World {
            envelope: Envelope::default(),
            resolution: [0; 3],
            sub_resolution: 0,
            sub_atlas_size: 8,
            block_size: 0,
            material_count: 256,
            material_animation_count: 8,
            tick_rate: 0,
            tick: 0,
            io_pin_state: false,
            camera_rotation: [0.0; 2],
            camera_translation: [0.0; 3],
            post_processing: PostProcessing::default(),
            hand_material_ids: [0; 8],
            hand_material_index: 0,
            previous_hand_material_index: 0,
            module: None,
            materials: Vec::new(),
            cell_data: GridPair::default(),
            flow_data: GridPair::default(),
        }
    }
}

/// Fixed header bytes between the envelope and the module pair.
const WORLD_FIELDS_LEN: usize = 6 + 1 + 1 + 2 + 2 + 1 + 1 + 4 + 1 // grid and sim fields
    + 2 * 4 + 3 * 4 // camera
    + POST_PROCESSING_LEN
    + 8 * 4 + 4 + 4; // hand materials

impl Container for World {
    const MAGIC: [u8; 4] = magic::WORLD;

    fn encode(&self) -> Vec<u8> {
        let module_data = self.module.as_ref().map(Module::encode).unwrap_or_default();
        let material_data: Vec<Vec<u8>> = self.materials.iter().map(Material::encode).collect();

        let mut layout = Layout::new();
        layout.field(self.envelope.encoded_len());
        layout.field(WORLD_FIELDS_LEN);
        layout.field(8); // module pair
        layout.field(4 + material_data.len() * 8);
        layout.field(8 + 8); // cell and flow pairs
        let module_range = BlobRange::new(
            layout.region(module_data.len()),
            module_data.len() as u32,
        );
        let material_ranges: Vec<BlobRange> = material_data
            .iter()
            .map(|data| BlobRange::new(layout.region(data.len()), data.len() as u32))
            .collect();
        // Dense numeric grid regions start on a word boundary no matter how
        // long the variable-length payloads before them ran.
        layout.align();
        let cell_range = BlobRange::new(
            layout.region(self.cell_data.len()),
            self.cell_data.len() as u32,
        );
        let flow_range = BlobRange::new(
            layout.region(self.flow_data.len()),
            self.flow_data.len() as u32,
        );

        let mut w = Writer::with_len(layout.total());
        self.envelope.write(&mut w, Self::MAGIC);
        for r in self.resolution {
            w.u16(r);
        }
        w.u8(self.sub_resolution);
        w.u8(self.sub_atlas_size);
        w.u16(self.block_size);
        w.u16(self.material_count);
        w.u8(self.material_animation_count);
        w.u8(self.tick_rate);
        w.u32(self.tick);
        w.u8(self.io_pin_state as u8);
        for v in self.camera_rotation {
            w.f32(v);
        }
        for v in self.camera_translation {
            w.f32(v);
        }
        self.post_processing.write(&mut w);
        w.u32_slice(&self.hand_material_ids);
        w.u32(self.hand_material_index);
        w.u32(self.previous_hand_material_index);
        module_range.write(&mut w);
        blob::write_table(&mut w, &material_ranges);
        cell_range.write(&mut w);
        flow_range.write(&mut w);
        w.bytes(&module_data);
        for data in &material_data {
            w.bytes(data);
        }
        w.align();
        w.bytes(self.cell_data.as_bytes());
        w.bytes(self.flow_data.as_bytes());
        w.finish()
    }

    fn decode_with(buf: &[u8], config: CodecConfig) -> Result<(Self, usize)> {
        let (envelope, header_len) = Envelope::decode(buf, Self::MAGIC)?;
        let mut r = Reader::new(buf);
        r.skip(header_len, "envelope")?;
        let resolution = [
            r.u16("resolution")?,
            r.u16("resolution")?,
            r.u16("resolution")?,
        ];
        let sub_resolution = r.u8("sub resolution")?;
        let sub_atlas_size = r.u8("sub atlas size")?;
        let block_size = r.u16("block size")?;
        let material_count = r.u16("material count")?;
        let material_animation_count = r.u8("material animation count")?;
        let tick_rate = r.u8("tick rate")?;
        let tick = r.u32("tick")?;
        let io_pin_state = r.u8("io pin state")? != 0;
        let camera_rotation = [r.f32("camera rotation")?, r.f32("camera rotation")?];
        let camera_translation = [
            r.f32("camera translation")?,
            r.f32("camera translation")?,
            r.f32("camera translation")?,
        ];
        let post_processing = PostProcessing::read(&mut r)?;
        let mut hand_material_ids = [0u32; 8];
        for id in hand_material_ids.iter_mut() {
            *id = r.u32("hand material ids")?;
        }
        let hand_material_index = r.u32("hand material index")?;
        let previous_hand_material_index = r.u32("previous hand material index")?;
        let module_range = BlobRange::read(&mut r, "module pair")?;
        let material_table = blob::read_table(&mut r, "material table")?;
        let cell_range = BlobRange::read(&mut r, "cell pair")?;
        let flow_range = BlobRange::read(&mut r, "flow pair")?;
        debug!(
            "world decode: {} materials, module {} B, cell {} B, flow {} B",
            material_table.len(),
            module_range.length,
            cell_range.length,
            flow_range.length
        );

        let consumed = material_table
            .iter()
            .chain([&module_range, &cell_range, &flow_range])
            .map(|range| range.offset as usize + range.length as usize)
            .fold(r.position(), usize::max);
        let world = World {
            envelope,
            resolution,
            sub_resolution,
            sub_atlas_size,
            block_size,
            material_count,
            material_animation_count,
            tick_rate,
            tick,
            io_pin_state,
            camera_rotation,
            camera_translation,
            post_processing,
            hand_material_ids,
            hand_material_index,
            previous_hand_material_index,
            module: blob::decode_optional(buf, module_range, config)?,
            materials: blob::decode_children(buf, &material_table, config)?,
            cell_data: GridPair::new(cell_range.slice(buf)?.to_vec()),
            flow_data: GridPair::new(flow_range.slice(buf)?.to_vec()),
        };
        Ok((world, consumed))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::hash::WorldHash;
    use crate::model::Model;
    use crate::module::FunctionTable;
    use rand::Rng;

    fn sample_module() -> Module {
        Module {
            input: vec![1, 2, 3, 4],
            input_remap: vec![0, 1, 2, 3],
            output: vec![5, 6],
            output_remap: vec![1, 0],
            function_table: FunctionTable::Bdd(vec![vec![0xA], vec![0xB, 0xC]]),
            ..Module::default()
        }
    }

    fn sample_world() -> World {
        World {
            envelope: Envelope {
                version: [0, 2, 1, 0],
                name: Some("demo world".into()),
                preview: Some(vec![0x55; 33]),
            },
            resolution: [64, 32, 64],
            sub_resolution: 4,
            block_size: 16,
            tick_rate: 60,
            tick: 12345,
            io_pin_state: true,
            camera_rotation: [0.5, -1.25],
            camera_translation: [10.0, 20.0, 30.0],
            hand_material_ids: [1, 2, 3, 4, 5, 6, 7, 8],
            hand_material_index: 2,
            previous_hand_material_index: 1,
            module: Some(sample_module()),
            materials: vec![
                Material {
                    id: 7,
                    density: 9,
                    conductivity: 2,
                    world_id: 99,
                    module: Some(sample_module()),
                    models: vec![Model {
                        resolution: 8,
                        data: vec![3; 512],
                        ..Model::default()
                    }],
                    ..Material::default()
                },
                Material::default(),
            ],
            cell_data: GridPair::from_halves(&[0x11; 128], &[0x22; 128]),
            flow_data: GridPair::from_halves(&[0x33; 64], &[0x44; 64]),
            ..World::default()
        }
    }

    #[test]
    fn roundtrip_full() {
        let world = sample_world();
        let buf = world.encode();
        let (back, consumed) = World::decode(&buf).unwrap();
        assert_eq!(back, world);
        assert_eq!(consumed, buf.len());
        // Decoded grids re-encode byte-identically.
        assert_eq!(back.encode(), buf);
    }

    #[test]
    fn roundtrip_default() {
        let world = World::default();
        let buf = world.encode();
        let (back, consumed) = World::decode(&buf).unwrap();
        assert_eq!(back, world);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn rejects_foreign_and_mismatched_magic() {
        assert!(matches!(
            World::decode(b"ZZ.. not this format at all"),
            Err(Error::InvalidFamilyMagic { .. })
        ));
        let module_buf = sample_module().encode();
        assert!(matches!(
            World::decode(&module_buf),
            Err(Error::InvalidTypeMagic { .. })
        ));
    }

    #[test]
    fn grid_regions_word_aligned_for_any_payload_lengths() {
        let mut rng = rand::thread_rng();
        for _ in 0..24 {
            let mut world = sample_world();
            world.envelope.name = Some("n".repeat(rng.gen_range(1..13)));
            world.envelope.preview = Some((0..rng.gen_range(1..9)).map(|_| rng.gen()).collect());
            world.materials = (0..rng.gen_range(0..4))
                .map(|_| Material {
                    models: vec![Model {
                        data: (0..rng.gen_range(0..77)).map(|_| rng.gen()).collect(),
                        ..Model::default()
                    }],
                    ..Material::default()
                })
                .collect();
            let buf = world.encode();
            let (back, _) = World::decode(&buf).unwrap();
            assert_eq!(back, world);

            // Re-read the cell pair straight from the header.
            let mut r = Reader::new(&buf);
            r.skip(world.envelope.encoded_len() + WORLD_FIELDS_LEN, "fields")
                .unwrap();
            BlobRange::read(&mut r, "module pair").unwrap();
            let table = blob::read_table(&mut r, "material table").unwrap();
            assert_eq!(table.len(), world.materials.len());
            let cell = BlobRange::read(&mut r, "cell pair").unwrap();
            assert_eq!(cell.offset % 4, 0);
        }
    }

    #[test]
    fn odd_grid_length_splits_short() {
        let cell = GridPair::new(vec![9; 257]);
        assert_eq!(cell.front().len() + cell.back().len(), 256);
        let world = World {
            cell_data: cell,
            ..World::default()
        };
        let buf = world.encode();
        let (back, _) = World::decode(&buf).unwrap();
        // The raw region survives in full; only the halves drop the odd byte.
        assert_eq!(back.cell_data.len(), 257);
        assert_eq!(back.cell_data.front().len(), 128);
        assert_eq!(back.cell_data.back().len(), 128);
        assert_eq!(back.encode(), buf);
    }

    #[test]
    fn save_load_scenario() {
        let world = World {
            resolution: [16, 16, 16],
            materials: vec![Material {
                id: 5,
                density: 3,
                conductivity: 0,
                world_hash: WorldHash::ZERO,
                models: vec![Model {
                    resolution: 8,
                    data: vec![0x6D; 512],
                    ..Model::default()
                }],
                ..Material::default()
            }],
            ..World::default()
        };
        let buf = world.encode();
        let (back, _) = World::decode(&buf).unwrap();
        assert_eq!(back, world);
        assert_eq!(back.materials.len(), 1);
        assert_eq!(back.materials[0].models[0].data, vec![0x6D; 512]);

        // The material blob table on the wire declares exactly one entry.
        let mut r = Reader::new(&buf);
        r.skip(world.envelope.encoded_len() + WORLD_FIELDS_LEN + 8, "header")
            .unwrap();
        let table = blob::read_table(&mut r, "material table").unwrap();
        assert_eq!(table.len(), 1);
    }
}
