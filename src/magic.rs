//! Magic constants identifying the container family and each container type.
//!
//! Every container starts with four magic bytes. The first two are the
//! family magic shared by all container types; the trailing two identify the
//! concrete type. Type magic must match exactly what the decoding caller
//! expects.

use crate::error::{Error, Result};

/// The two-byte magic shared by every container in the format.
pub const FAMILY: [u8; 2] = *b"VX";

/// Type magic of a world container.
pub const WORLD: [u8; 4] = *b"VXWO";
/// Type magic of a logic module container.
pub const MODULE: [u8; 4] = *b"VXMO";
/// Type magic of a material container.
pub const MATERIAL: [u8; 4] = *b"VXMA";
/// Type magic of a material model container.
pub const MODEL: [u8; 4] = *b"VXMM";

/// Returns the four magic bytes of the buffer, if it holds at least four.
pub fn type_of(buf: &[u8]) -> Option<[u8; 4]> {
    let bytes: &[u8; 4] = buf.get(..4)?.try_into().ok()?;
    Some(*bytes)
}

/// Indicates whether the buffer starts with the family magic.
pub fn is_family(buf: &[u8]) -> bool {
    buf.len() >= 2 && buf[..2] == FAMILY
}

/// Validates the magic prefix of a container buffer against the expected
/// type magic. Checks the family bytes first so that a buffer from an
/// entirely different format is reported as such rather than as the wrong
/// container type.
pub(crate) fn expect(buf: &[u8], expected: [u8; 4]) -> Result<()> {
    let actual = type_of(buf).ok_or(Error::LengthTooShort {
        step: "magic",
        actual: buf.len(),
        expected: 4,
    })?;
    if actual[..2] != FAMILY {
        return Err(Error::InvalidFamilyMagic {
            expected: FAMILY,
            actual: [actual[0], actual[1]],
        });
    }
    if actual != expected {
        return Err(Error::InvalidTypeMagic { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn family_sniffing() {
        assert!(is_family(b"VXWO rest of buffer"));
        assert!(is_family(b"VX"));
        assert!(!is_family(b"V"));
        assert!(!is_family(b"NOPE"));
    }

    #[test]
    fn expect_rejects_family_first() {
        let err = expect(b"ZZWO....", WORLD).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidFamilyMagic {
                expected: FAMILY,
                actual: *b"ZZ",
            }
        );
    }

    #[test]
    fn expect_rejects_wrong_type() {
        let err = expect(b"VXMA....", WORLD).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidTypeMagic {
                expected: WORLD,
                actual: MATERIAL,
            }
        );
    }

    #[test]
    fn expect_short_buffer() {
        assert!(matches!(
            expect(b"VX", WORLD),
            Err(Error::LengthTooShort { step: "magic", .. })
        ));
    }
}
