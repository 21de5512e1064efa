//! Crockford Base32 symbol tables.

/// Index to symbol.
// cspell:disable-next-line
pub const ENCODE: [u8; 32] = *b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Marker in [`DECODE`] for bytes outside the alphabet.
pub const INVALID: u8 = 0xFF;

/// Byte to symbol value, or [`INVALID`].
///
/// Both cases of every letter decode to the same value. The excluded letters
/// follow Crockford's equivalences: `I` and `L` read as `1`, `O` reads as `0`.
/// `U` and every non-ASCII byte are invalid.
#[allow(clippy::cast_possible_truncation)]
pub const DECODE: [u8; 256] = {
    let mut table = [INVALID; 256];

    let mut i = 0;
    while i < ENCODE.len() {
        let c = ENCODE[i];
        table[c as usize] = i as u8;
        table[c.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }

    table[b'I' as usize] = 1;
    table[b'i' as usize] = 1;
    table[b'L' as usize] = 1;
    table[b'l' as usize] = 1;
    table[b'O' as usize] = 0;
    table[b'o' as usize] = 0;

    table
};

/// Looks up the 5-bit value of a symbol.
#[inline]
pub const fn symbol_value(c: u8) -> Option<u8> {
    match DECODE[c as usize] {
        INVALID => None,
        value => Some(value),
    }
}

/// Canonical symbol for a valid input byte.
#[inline]
pub const fn canonical_symbol(c: u8) -> Option<u8> {
    match symbol_value(c) {
        Some(value) => Some(ENCODE[value as usize]),
        None => None,
    }
}
