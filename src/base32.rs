use std::{borrow::Cow, str::from_utf8_unchecked};

use crate::{
    alphabet::{canonical_symbol, symbol_value, ENCODE},
    util, Error, ULID_BYTE_LEN, ULID_STR_LEN,
};

/// Encodes 16 bytes into the given buffer, most significant group first.
///
/// The 128 bits are split into 26 groups of 5 bits. The first group only
/// carries 3 payload bits, so the first character is always in `0..=7`.
pub fn encode_to_buffer<'a>(ulid: &[u8; ULID_BYTE_LEN], buffer: &'a mut [u8; ULID_STR_LEN]) -> &'a str {
    let mut n = u128::from_be_bytes(*ulid);

    for byte in buffer.iter_mut().rev() {
        *byte = ENCODE[(n & 0x1F) as usize];
        n >>= 5;
    }

    // Safety: Encoding above guarantees valid UTF-8
    unsafe { from_utf8_unchecked(buffer) }
}

/// Encodes a binary ULID into its 26 character text form.
///
/// # Errors
///
/// Returns [`Error::InvalidByteLength`] if `ulid` is not exactly 16 bytes long.
///
/// # Example
///
/// ```
/// assert_eq!(ulid_codec::encode(&[0; 16]).unwrap(), "00000000000000000000000000");
/// assert_eq!(ulid_codec::encode(&[0xFF; 16]).unwrap(), "7ZZZZZZZZZZZZZZZZZZZZZZZZZ");
/// ```
pub fn encode(ulid: &[u8]) -> Result<String, Error> {
    let ulid = util::as_bytes(ulid)?;
    let mut buffer = [0; ULID_STR_LEN];
    Ok(encode_to_buffer(ulid, &mut buffer).to_owned())
}

fn decode_bits(text: &[u8; ULID_STR_LEN]) -> Result<(u8, u128), Error> {
    let first = symbol_value(text[0]).ok_or(Error::InvalidChar)?;
    let mut n = u128::from(first);

    for &c in &text[1..] {
        let value = symbol_value(c).ok_or(Error::InvalidChar)?;
        // The top 2 bits of the first symbol are shifted out here.
        n = (n << 5) | u128::from(value);
    }

    Ok((first, n))
}

/// Decodes a 26 character ULID string into 16 bytes.
///
/// Upper and lower case are accepted alike, `I`/`L` read as `1` and `O` reads as `0`.
///
/// The first character is not range checked: symbols above `7` carry bits
/// beyond the 128 bit payload, and those bits are dropped. Use [`decode_strict`]
/// to reject such strings instead.
///
/// # Errors
///
/// - [`Error::InvalidTextLength`] if `text` is not exactly 26 bytes long.
/// - [`Error::InvalidChar`] if any character is outside the alphabet.
///
/// # Example
///
/// ```
/// assert_eq!(ulid_codec::decode("7ZZZZZZZZZZZZZZZZZZZZZZZZZ"), Ok([0xFF; 16]));
/// assert_eq!(ulid_codec::decode("7zzzzzzzzzzzzzzzzzzzzzzzzz"), Ok([0xFF; 16]));
/// ```
pub fn decode(text: &str) -> Result<[u8; ULID_BYTE_LEN], Error> {
    let text = util::as_text(text.as_bytes())?;
    let (_, n) = decode_bits(text)?;
    Ok(n.to_be_bytes())
}

/// Decodes a 26 character ULID string, rejecting strings that overflow 128 bits.
///
/// # Errors
///
/// Same as [`decode`], and additionally [`Error::Overflow`] if the first
/// character is above `7`.
///
/// # Example
///
/// ```
/// use ulid_codec::Error;
///
/// assert_eq!(ulid_codec::decode_strict("7ZZZZZZZZZZZZZZZZZZZZZZZZZ"), Ok([0xFF; 16]));
/// assert_eq!(ulid_codec::decode_strict("80000000000000000000000000"), Err(Error::Overflow));
/// ```
pub fn decode_strict(text: &str) -> Result<[u8; ULID_BYTE_LEN], Error> {
    let text = util::as_text(text.as_bytes())?;
    let (first, n) = decode_bits(text)?;

    if first <= 7 {
        Ok(n.to_be_bytes())
    } else {
        Err(Error::Overflow)
    }
}

pub fn validate(text: &[u8; ULID_STR_LEN]) -> Result<(), Error> {
    decode_bits(text).and_then(|(first, _)| if first <= 7 { Ok(()) } else { Err(Error::Overflow) })
}

pub fn canonicalize(buffer: &mut [u8; ULID_STR_LEN]) -> Result<&str, Error> {
    validate(buffer)?;

    for byte in buffer.iter_mut() {
        *byte = canonical_symbol(*byte).ok_or(Error::InvalidChar)?;
    }

    // Safety: Every byte was replaced by an alphabet symbol above
    Ok(unsafe { from_utf8_unchecked(buffer) })
}

/// Canonicalizes a ULID string.
///
/// Letters are upper-cased, `I`/`L` are replaced by `1` and `O` by `0`.
/// If the input is already canonical, it is returned borrowed without allocating.
///
/// # Errors
///
/// The string must have length 26, contain only alphabet characters and not
/// overflow 128 bits. If not, an error is returned.
///
/// # Example
///
/// ```
// cspell:disable-next-line
/// let s = "olixjazthsfjzt7wd6j8ir92vn";
///
// cspell:disable-next-line
/// assert_eq!(ulid_codec::canonicalize(s), Ok("011XJAZTHSFJZT7WD6J81R92VN".into()));
/// ```
pub fn canonicalize_str(text: &str) -> Result<Cow<'_, str>, Error> {
    let mut buffer = *util::as_text(text.as_bytes())?;
    let cleaned = canonicalize(&mut buffer)?;

    if cleaned == text {
        Ok(text.into())
    } else {
        Ok(cleaned.to_string().into())
    }
}

/// Checks a ULID string for validity.
///
/// To be valid, a ULID string must have length 26, contain only alphabet
/// characters, and its first character must not be above `7`.
///
/// # Errors
///
/// If the string is not valid, the reason is returned.
///
/// # Example
///
/// ```
/// use ulid_codec::Error;
///
/// assert!(ulid_codec::validate("7zzzzzzzzzzzzzzzzzzzzzzzzz").is_ok());
/// assert_eq!(ulid_codec::validate("80000000000000000000000000"), Err(Error::Overflow));
/// assert_eq!(ulid_codec::validate("0000000000000000000000u89$"), Err(Error::InvalidChar));
/// assert_eq!(ulid_codec::validate("xxxxxxxxxxxxxxxxxxxxxx"), Err(Error::InvalidTextLength(22)));
/// ```
pub fn validate_str(text: &str) -> Result<(), Error> {
    validate(util::as_text(text.as_bytes())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> [u8; 16] {
        [
            0x01, 0x92, 0xB6, 0xE7, 0x09, 0x8B, 0x16, 0x03, 0x4B, 0x04, 0x93, 0xB0, 0x15, 0xC0, 0xF0, 0x3F,
        ]
    }

    #[test]
    fn test_encode_known_value() {
        // cspell:disable-next-line
        assert_eq!(encode(&sample()).unwrap(), "01JAVEE2CB2R1MP14KP0AW1W1Z");
    }

    #[test]
    fn test_encode_single_bits() {
        let mut ulid = [0; 16];
        ulid[15] = 1;
        assert_eq!(encode(&ulid).unwrap(), "00000000000000000000000001");

        let mut ulid = [0; 16];
        ulid[0] = 0x80;
        assert_eq!(encode(&ulid).unwrap(), "40000000000000000000000000");

        let mut ulid = [0; 16];
        ulid[0] = 0x1F;
        assert_eq!(encode(&ulid).unwrap(), "0Z000000000000000000000000");
    }

    #[test]
    fn test_encode_rejects_wrong_length() {
        assert_eq!(encode(&[0; 15]), Err(Error::InvalidByteLength(15)));
        assert_eq!(encode(&[0; 17]), Err(Error::InvalidByteLength(17)));
        assert_eq!(encode(&[]), Err(Error::InvalidByteLength(0)));
    }

    #[test]
    fn test_decode_known_value() {
        // cspell:disable-next-line
        assert_eq!(decode("01JAVEE2CB2R1MP14KP0AW1W1Z"), Ok(sample()));
        // cspell:disable-next-line
        assert_eq!(decode("01javee2cb2r1mp14kpoawiwiz"), Ok(sample()));
    }

    #[test]
    fn test_decode_drops_overflow_bits() {
        assert_eq!(decode("ZZZZZZZZZZZZZZZZZZZZZZZZZZ"), Ok([0xFF; 16]));
        assert_eq!(decode("80000000000000000000000000"), Ok([0; 16]));
        assert_eq!(decode("90000000000000000000000001"), decode("10000000000000000000000001"));
    }

    #[test]
    fn test_decode_rejects_invalid_chars() {
        assert_eq!(decode("0000000000000000000000000U"), Err(Error::InvalidChar));
        assert_eq!(decode("u0000000000000000000000000"), Err(Error::InvalidChar));
        assert_eq!(decode("000000000000-0000000000000"), Err(Error::InvalidChar));
        assert_eq!(decode("0000000000000000000000000 "), Err(Error::InvalidChar));
    }

    #[test]
    fn test_decode_rejects_non_ascii() {
        // 'ä' is two bytes long, so 25 chars make 26 bytes
        assert_eq!(decode("ä000000000000000000000000"), Err(Error::InvalidChar));
        // 26 chars with a multibyte one are too long
        assert_eq!(decode("ä0000000000000000000000000"), Err(Error::InvalidTextLength(27)));
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert_eq!(decode(""), Err(Error::InvalidTextLength(0)));
        assert_eq!(decode("0000000000000000000000000"), Err(Error::InvalidTextLength(25)));
        assert_eq!(decode("000000000000000000000000000"), Err(Error::InvalidTextLength(27)));
        // length is checked before content
        assert_eq!(decode("UUUUUUUUUUUUUUUUUUUUUUUUU"), Err(Error::InvalidTextLength(25)));
    }

    #[test]
    fn test_decode_strict() {
        assert_eq!(decode_strict("7ZZZZZZZZZZZZZZZZZZZZZZZZZ"), Ok([0xFF; 16]));
        assert_eq!(decode_strict("ZZZZZZZZZZZZZZZZZZZZZZZZZZ"), Err(Error::Overflow));
        assert_eq!(decode_strict("8ZZZZZZZZZZZZZZZZZZZZZZZZU"), Err(Error::InvalidChar));
        assert_eq!(decode_strict("lZZZZZZZZZZZZZZZZZZZZZZZZZ"), decode("1ZZZZZZZZZZZZZZZZZZZZZZZZZ"));
    }

    #[test]
    fn test_canonicalize() {
        let src = "0abcdefghijklmnopqrstvwxyz"; // cspell:disable-line
        let exp = "0ABCDEFGH1JK1MN0PQRSTVWXYZ"; // cspell:disable-line

        let c1 = canonicalize_str(src).unwrap();
        assert!(matches!(c1, Cow::Owned(_)));
        assert_eq!(c1, exp);

        let c2 = canonicalize_str(&c1).unwrap();
        assert!(matches!(c2, Cow::Borrowed(_)));
        assert_eq!(c2, exp);

        assert_eq!(
            canonicalize_str("000000000oooooooooOOOOOOOO"),
            Ok("00000000000000000000000000".into())
        );
        assert_eq!(
            canonicalize_str("iiiiiiiiiillllllllll111111"), // cspell:disable-line
            Ok("11111111111111111111111111".into())
        );
        assert_eq!(canonicalize_str("80000000000000000000000000"), Err(Error::Overflow));
        assert_eq!(canonicalize_str("1234567890123456789012345"), Err(Error::InvalidTextLength(25)));
    }

    #[test]
    fn test_validate() {
        assert!(validate_str("0abcdefghijklmnopqrstvwxyz").is_ok()); // cspell:disable-line
        assert!(validate_str("oooooooooooooooooooooooooo").is_ok());
        assert!(validate_str("LLLLLLLLLLLLLLLLLLLLLLLLLL").is_ok());
        assert_eq!(validate_str("zzzzzzzzzzzzzzzzzzzzzzzzzz"), Err(Error::Overflow));
        assert_eq!(validate_str(""), Err(Error::InvalidTextLength(0)));
    }
}
