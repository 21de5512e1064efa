use crate::{Error, TIMESTAMP_BYTE_LEN, TIMESTAMP_MAX, ULID_BYTE_LEN};

/// Packs the low 48 bits of a timestamp into 6 big-endian bytes.
///
/// Bits above bit 47 are discarded.
///
/// # Example
///
/// ```
/// assert_eq!(ulid_codec::pack_timestamp(0x0102_0304_0506), [1, 2, 3, 4, 5, 6]);
/// assert_eq!(ulid_codec::pack_timestamp(u64::MAX), [0xFF; 6]);
/// ```
#[must_use]
pub const fn pack(timestamp: u64) -> [u8; TIMESTAMP_BYTE_LEN] {
    let bytes = (timestamp & TIMESTAMP_MAX).to_be_bytes();
    [bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7]]
}

/// Unpacks 6 big-endian bytes into a timestamp.
///
/// The top 16 bits of the result are always zero.
///
/// # Example
///
/// ```
/// assert_eq!(ulid_codec::unpack_timestamp([0, 0, 0, 0, 0, 1]), 1);
/// ```
#[must_use]
pub const fn unpack(bytes: [u8; TIMESTAMP_BYTE_LEN]) -> u64 {
    u64::from_be_bytes([0, 0, bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]])
}

/// Reads the timestamp from a binary ULID.
///
/// # Errors
///
/// Returns [`Error::InvalidByteLength`] if `ulid` is not exactly 16 bytes long.
///
/// # Example
///
/// ```
/// assert_eq!(ulid_codec::extract_timestamp(&[0; 16]), Ok(0));
/// assert!(ulid_codec::extract_timestamp(&[0; 6]).is_err());
/// ```
pub fn extract(ulid: &[u8]) -> Result<u64, Error> {
    if ulid.len() != ULID_BYTE_LEN {
        return Err(Error::InvalidByteLength(ulid.len()));
    }

    let mut bytes = [0; TIMESTAMP_BYTE_LEN];
    bytes.copy_from_slice(&ulid[..TIMESTAMP_BYTE_LEN]);

    Ok(unpack(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_is_big_endian() {
        assert_eq!(pack(0), [0; 6]);
        assert_eq!(pack(1), [0, 0, 0, 0, 0, 1]);
        assert_eq!(pack(0x0100), [0, 0, 0, 0, 1, 0]);
        assert_eq!(pack(1_729_645_447_563), [0x01, 0x92, 0xB6, 0xE7, 0x09, 0x8B]);
    }

    #[test]
    fn test_pack_masks_to_48_bits() {
        assert_eq!(pack(1 << 48), [0; 6]);
        assert_eq!(pack((1 << 48) | 7), [0, 0, 0, 0, 0, 7]);
        assert_eq!(pack(TIMESTAMP_MAX), [0xFF; 6]);
    }

    #[test]
    fn test_unpack_inverts_pack() {
        for ts in [0, 1, 255, 256, 1_729_645_447_563, TIMESTAMP_MAX - 1, TIMESTAMP_MAX] {
            assert_eq!(unpack(pack(ts)), ts);
        }
        assert_eq!(unpack([0xFF; 6]), TIMESTAMP_MAX);
    }

    #[test]
    fn test_extract() {
        let mut ulid = [0xAB; 16];
        ulid[..6].copy_from_slice(&[0, 0, 0, 0, 0x01, 0x02]);
        assert_eq!(extract(&ulid), Ok(0x0102));

        assert_eq!(extract(&[0; 16]), Ok(0));
        assert_eq!(extract(&[0xFF; 16]), Ok(TIMESTAMP_MAX));
    }

    #[test]
    fn test_extract_rejects_wrong_length() {
        assert_eq!(extract(&[]), Err(Error::InvalidByteLength(0)));
        assert_eq!(extract(&[0; 15]), Err(Error::InvalidByteLength(15)));
        assert_eq!(extract(&[0; 17]), Err(Error::InvalidByteLength(17)));
    }
}
