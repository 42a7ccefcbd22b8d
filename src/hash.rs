//! Content hash of a referenced world.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::fmt;

/// Byte length of a world content hash.
pub const HASH_BYTES: usize = 32;

/// 256-bit content hash of a referenced world.
///
/// The codec treats the digest as opaque bytes; producing and verifying it
/// is the caller's concern. A zero hash is the conventional "no reference"
/// value.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WorldHash([u8; HASH_BYTES]);

impl WorldHash {
    pub const ZERO: WorldHash = WorldHash([0; HASH_BYTES]);

    pub fn new(digest: [u8; HASH_BYTES]) -> Self {
        WorldHash(digest)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }
}

impl From<[u8; HASH_BYTES]> for WorldHash {
    fn from(digest: [u8; HASH_BYTES]) -> Self {
        WorldHash(digest)
    }
}

impl AsRef<[u8]> for WorldHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for WorldHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl fmt::Debug for WorldHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WorldHash({})", self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn displays_as_base64() {
        assert_eq!(
            WorldHash::ZERO.to_string(),
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
        );
    }

    #[test]
    fn from_fixture() {
        let digest: [u8; HASH_BYTES] =
            hex::decode("00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff")
                .unwrap()
                .try_into()
                .unwrap();
        let hash = WorldHash::new(digest);
        assert_eq!(hash.as_bytes(), &digest);
        assert_ne!(hash, WorldHash::ZERO);
    }
}
