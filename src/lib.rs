//! vox-pack is a binary container format for hierarchical voxel-world
//! assets: worlds, logic modules (boolean-circuit representations of
//! in-world logic), materials, and material voxel models.
//!
//! Every container shares the same envelope (four magic bytes, four raw
//! version bytes, an optional name, and an optional preview) followed by a
//! type-specific header that addresses its variable-length payloads through
//! `(offset, length)` pairs. Nested children are complete standalone
//! containers in their own right: a [`Material`] embeds a full [`Module`]
//! and [`Model`] containers, a [`World`] embeds a [`Module`] and
//! [`Material`] containers, recursively.
//!
//! Encoding is two-phase throughout: the full byte length of a container is
//! computed analytically (children already encoded, so sibling lengths are
//! known), one buffer is allocated, and a second pass fills it. Decoding
//! hands each addressed byte range to the child type's own decoder.
//!
//! ```
//! use vox_pack::{Container, Material, Model, World};
//!
//! let world = World {
//!     resolution: [16, 16, 16],
//!     materials: vec![Material {
//!         id: 5,
//!         models: vec![Model { resolution: 8, data: vec![0; 512], ..Default::default() }],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//! let buf = world.encode();
//! let (back, consumed) = World::decode(&buf).unwrap();
//! assert_eq!(back, world);
//! assert_eq!(consumed, buf.len());
//! ```
//!
//! The codecs are pure functions of their inputs: no internal state, no
//! blocking, no partial results. Any structural violation aborts the decode
//! of the offending container and of every ancestor decoding it as a child.
//! Compression is deliberately outside the format; see [`compress`] for
//! the gzip transport wrapper applied around whole encoded buffers.

mod blob;
mod container;
mod decode;
mod encode;
mod envelope;
mod error;
mod hash;
mod material;
mod model;
mod module;
mod world;

pub mod compress;
pub mod magic;
pub mod utils;

pub use self::blob::BlobRange;
pub use self::container::{CodecConfig, Container, FunctionTableForm};
pub use self::envelope::Envelope;
pub use self::error::{Error, Result};
pub use self::hash::{WorldHash, HASH_BYTES};
pub use self::material::Material;
pub use self::model::Model;
pub use self::module::{FunctionTable, Module};
pub use self::world::{GridPair, PostProcessing, World};
