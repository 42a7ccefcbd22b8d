//! Transport-level gzip wrapping for fully-encoded container buffers.
//!
//! Compression sits entirely outside the container format: the codecs never
//! compress or decompress, and a compressed buffer must be unwrapped here
//! (or by any other gzip implementation) before it is handed to a decoder.
//! Errors are plain I/O errors; a failure to unwrap is a transport problem,
//! not a structural violation of the container.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};

/// Wraps an encoded buffer in a gzip stream.
pub fn compress(buf: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(buf)?;
    encoder.finish()
}

/// Unwraps a gzip stream back into the encoded buffer it carries.
pub fn decompress(buf: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(buf);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let payload: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        let packed = compress(&payload).unwrap();
        assert_ne!(packed, payload);
        assert_eq!(decompress(&packed).unwrap(), payload);
    }

    #[test]
    fn garbage_is_a_transport_error() {
        assert!(decompress(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }

    #[test]
    fn wraps_encoded_containers() {
        use crate::{Container, GridPair, World};
        let world = World {
            resolution: [8, 8, 8],
            cell_data: GridPair::from_halves(&[0xAB; 2048], &[0xCD; 2048]),
            ..World::default()
        };
        let buf = world.encode();
        let packed = compress(&buf).unwrap();
        let unpacked = decompress(&packed).unwrap();
        assert_eq!(unpacked, buf);
        let (back, _) = World::decode(&unpacked).unwrap();
        assert_eq!(back, world);
    }
}
