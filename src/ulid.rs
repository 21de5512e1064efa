use std::{
    fmt,
    str::FromStr,
    time::{Duration, SystemTime},
};

use crate::{
    base32, generator, timestamp, util, Error, RANDOMNESS_BYTE_LEN, TIMESTAMP_BYTE_LEN, ULID_BYTE_LEN, ULID_STR_LEN,
};

/// A ULID in its 16 byte binary form.
///
/// Bytes `0..6` hold the big-endian timestamp, bytes `6..16` the randomness.
/// Comparing `Ulid`s compares their bytes, which orders them by timestamp first.
///
/// Formatting a `Ulid` yields its canonical 26 character text form, parsing
/// accepts any case and the Crockford equivalences for `I`, `L` and `O`.
///
/// # Example
///
/// ```
/// use ulid_codec::Ulid;
///
/// let u = Ulid::from_parts(1, [0; 10]);
///
/// assert_eq!(u.to_string(), "00000000010000000000000000");
/// assert_eq!("00000000010000000000000000".parse::<Ulid>(), Ok(u));
/// ```
#[derive(Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Ulid([u8; ULID_BYTE_LEN]);

impl Ulid {
    /// The all zero ULID.
    pub const MIN: Self = Self([0; ULID_BYTE_LEN]);

    /// The largest ULID, all bits set.
    pub const MAX: Self = Self([0xFF; ULID_BYTE_LEN]);

    /// Generates a new ULID from the system clock and the platform random source.
    ///
    /// Two ULIDs generated within the same millisecond are not ordered among each other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockUnavailable`] or [`Error::EntropyUnavailable`] if a source fails.
    ///
    /// # Example
    ///
    /// ```
    /// use ulid_codec::Ulid;
    ///
    /// let u = Ulid::generate()?;
    ///
    /// assert!(u.timestamp() > 1704067200000); // 1st January 2024
    /// # Ok::<(), ulid_codec::Error>(())
    /// ```
    #[cfg(feature = "rand")]
    pub fn generate() -> Result<Self, Error> {
        generator::generate(None, None).map(Self)
    }

    /// Creates a ULID from a timestamp and 10 bytes of randomness.
    ///
    /// The timestamp is masked to 48 bits.
    #[must_use]
    pub fn from_parts(timestamp: u64, randomness: [u8; RANDOMNESS_BYTE_LEN]) -> Self {
        Self(generator::compose(timestamp, &randomness))
    }

    /// Splits the ULID into timestamp and randomness.
    #[must_use]
    pub fn to_parts(self) -> (u64, [u8; RANDOMNESS_BYTE_LEN]) {
        (self.timestamp(), self.randomness())
    }

    /// Returns the timestamp part in milliseconds since the Unix epoch.
    ///
    /// # Example
    ///
    /// ```
    /// use ulid_codec::Ulid;
    ///
    /// assert_eq!(Ulid::MAX.timestamp(), (1 << 48) - 1);
    /// ```
    #[must_use]
    pub const fn timestamp(self) -> u64 {
        let b = self.0;
        timestamp::unpack([b[0], b[1], b[2], b[3], b[4], b[5]])
    }

    /// Returns the random part.
    #[must_use]
    pub fn randomness(self) -> [u8; RANDOMNESS_BYTE_LEN] {
        let mut randomness = [0; RANDOMNESS_BYTE_LEN];
        randomness.copy_from_slice(&self.0[TIMESTAMP_BYTE_LEN..]);
        randomness
    }

    /// Returns the timestamp part as a `SystemTime`, or `None` if the platform cannot represent it.
    #[must_use]
    pub fn datetime(self) -> Option<SystemTime> {
        SystemTime::UNIX_EPOCH.checked_add(Duration::from_millis(self.timestamp()))
    }

    /// Creates a ULID from its binary form.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ULID_BYTE_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the binary form.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; ULID_BYTE_LEN] {
        self.0
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ULID_BYTE_LEN] {
        &self.0
    }

    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(n.to_be_bytes())
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Converts a ULID into a string, returning `None` instead of aborting if memory is exhausted.
    #[must_use]
    pub fn try_to_string(self) -> Option<String> {
        let mut s = String::new();
        s.try_reserve_exact(ULID_STR_LEN).ok()?;

        let mut buffer = [0; ULID_STR_LEN];
        s.push_str(base32::encode_to_buffer(&self.0, &mut buffer));

        Some(s)
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        util::debug_ulid("Ulid", &self.0, f)
    }
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0; ULID_STR_LEN];
        f.write_str(base32::encode_to_buffer(&self.0, &mut buffer))
    }
}

impl FromStr for Ulid {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        base32::decode(s).map(Self)
    }
}

impl From<Ulid> for [u8; ULID_BYTE_LEN] {
    fn from(ulid: Ulid) -> Self {
        ulid.0
    }
}

impl From<[u8; ULID_BYTE_LEN]> for Ulid {
    fn from(bytes: [u8; ULID_BYTE_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Ulid> for u128 {
    fn from(ulid: Ulid) -> Self {
        ulid.to_u128()
    }
}

impl From<u128> for Ulid {
    fn from(n: u128) -> Self {
        Self::from_u128(n)
    }
}

impl TryFrom<&[u8]> for Ulid {
    type Error = Error;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        util::as_bytes(bytes).map(|bytes| Self(*bytes))
    }
}

impl AsRef<[u8]> for Ulid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
