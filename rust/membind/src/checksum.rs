//! Byte-sequence checksums used as a lightweight integrity signal.

use crate::error::{Error, Result};

/// Computes the checksum of a buffer: the bitwise complement of the
/// wrapping sum of its bytes widened to `u32`.
///
/// Deterministic and reproducible across runs; two buffers collide
/// exactly when their byte sums match. Not cryptographic — an
/// illustrative integrity signal only. An empty buffer yields `!0`.
pub fn compute(buf: &[u8]) -> u32 {
    !buf.iter()
        .fold(0u32, |sum, &b| sum.wrapping_add(u32::from(b)))
}

/// Validates a buffer by comparing its computed checksum with the
/// provided one.
///
/// # Arguments
///
/// * `buf` - The bytes to validate.
/// * `checksum` - The expected digest.
/// * `name` - Optional name of the element being validated, used for
///   error reporting.
///
/// # Errors
///
/// `ChecksumMismatch` if the computed digest differs from `checksum`.
pub fn validate_buffer(buf: &[u8], checksum: u32, name: Option<&str>) -> Result<()> {
    let actual = compute(buf);
    if actual == checksum {
        Ok(())
    } else {
        Err(Error::checksum_mismatch(name.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_compute_empty() {
        assert_eq!(compute(&[]), !0u32);
        assert_eq!(compute(&[]), 0xffff_ffff);
    }

    #[test]
    fn test_compute_known_value() {
        // !(1 + 2 + 3)
        assert_eq!(compute(&[1, 2, 3]), !6u32);
    }

    #[test]
    fn test_compute_deterministic() {
        let buf = b"some sample payload";
        assert_eq!(compute(buf), compute(buf));
    }

    #[test]
    fn test_compute_depends_on_sum() {
        let a = compute(&[10, 20, 30]);
        let mut altered = [10, 20, 30];
        altered[0] ^= 1;
        assert_ne!(a, compute(&altered));
        // A permutation preserves the sum, so the digest collides.
        assert_eq!(a, compute(&[30, 10, 20]));
    }

    #[test]
    fn test_validate_buffer_valid() {
        let buf = b"testdata";
        let checksum = compute(buf);
        assert!(validate_buffer(buf, checksum, Some("buffer")).is_ok());
    }

    #[test]
    fn test_validate_buffer_invalid_checksum() {
        let buf = b"testdata";
        let checksum = compute(buf) ^ 1;
        let err = validate_buffer(buf, checksum, Some("buffer")).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::ChecksumMismatch { element } if element.as_str() == "buffer"
        ));
    }
}
