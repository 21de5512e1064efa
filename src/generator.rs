#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    entropy::{PlatformRandom, RandomSource, SystemClock, TimeSource},
    timestamp, util, Error, RANDOMNESS_BYTE_LEN, TIMESTAMP_BYTE_LEN, ULID_BYTE_LEN,
};

/// Composes timestamps and randomness into binary ULIDs.
///
/// A `Generator` owns its clock and its random source. It keeps no other
/// state, so ULIDs generated within the same millisecond are not ordered
/// among each other.
///
/// # Example
///
/// ```
/// use ulid_codec::{Error, Generator, RandomSource, TimeSource};
///
/// struct Fixed;
/// impl TimeSource for Fixed {
///     fn now_millis(&self) -> Result<u64, Error> {
///         Ok(42)
///     }
/// }
/// impl RandomSource for Fixed {
///     fn fill(&self, buffer: &mut [u8; 10]) -> Result<(), Error> {
///         buffer.fill(0xAA);
///         Ok(())
///     }
/// }
///
/// let generator = Generator::new(Fixed, Fixed);
/// let ulid = generator.generate(None, None)?;
///
/// assert_eq!(ulid[..6], [0, 0, 0, 0, 0, 42]);
/// assert_eq!(ulid[6..], [0xAA; 10]);
/// # Ok::<(), Error>(())
/// ```
#[derive(Default, Clone, Debug)]
pub struct Generator<T = SystemClock, R = PlatformRandom> {
    clock: T,
    rng: R,
}

impl<T: TimeSource, R: RandomSource> Generator<T, R> {
    /// Creates a generator from a time source and a random source.
    pub const fn new(clock: T, rng: R) -> Self {
        Self { clock, rng }
    }

    /// Generates a binary ULID.
    ///
    /// - A given `timestamp` is used verbatim, masked to 48 bits. Without one,
    ///   the clock is read.
    /// - Of a given `randomness` only the first 10 bytes are used. Without one,
    ///   10 bytes are read from the random source.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRandomnessLength`] if `randomness` is shorter than 10 bytes.
    /// - [`Error::ClockUnavailable`] if the clock cannot be read.
    /// - [`Error::EntropyUnavailable`] if the random source fails.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, randomness)))]
    pub fn generate(&self, timestamp: Option<u64>, randomness: Option<&[u8]>) -> Result<[u8; ULID_BYTE_LEN], Error> {
        let timestamp = match timestamp {
            Some(timestamp) => timestamp,
            None => self.clock.now_millis()?,
        };

        let random = if let Some(bytes) = randomness {
            util::as_randomness(bytes)?
        } else {
            let mut buffer = [0; RANDOMNESS_BYTE_LEN];
            self.rng.fill(&mut buffer)?;
            buffer
        };

        Ok(compose(timestamp, &random))
    }

    /// Returns the time source.
    pub const fn clock(&self) -> &T {
        &self.clock
    }

    /// Returns the random source.
    pub const fn random_source(&self) -> &R {
        &self.rng
    }
}

/// Concatenates the packed timestamp and the randomness.
#[must_use]
pub fn compose(timestamp: u64, randomness: &[u8; RANDOMNESS_BYTE_LEN]) -> [u8; ULID_BYTE_LEN] {
    let mut ulid = [0; ULID_BYTE_LEN];
    ulid[..TIMESTAMP_BYTE_LEN].copy_from_slice(&timestamp::pack(timestamp));
    ulid[TIMESTAMP_BYTE_LEN..].copy_from_slice(randomness);
    ulid
}

/// Generates a binary ULID with the system clock and the platform random source.
///
/// See [`Generator::generate`] for how `timestamp` and `randomness` are used.
///
/// # Errors
///
/// Same as [`Generator::generate`].
///
/// # Example
///
/// ```
/// let ulid = ulid_codec::generate(Some(1), Some(&[0; 10]))?;
///
/// assert_eq!(ulid, [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
/// # Ok::<(), ulid_codec::Error>(())
/// ```
pub fn generate(timestamp: Option<u64>, randomness: Option<&[u8]>) -> Result<[u8; ULID_BYTE_LEN], Error> {
    Generator::<SystemClock, PlatformRandom>::default().generate(timestamp, randomness)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::entropy::NoRandom;

    struct FixedClock(u64);
    impl TimeSource for FixedClock {
        fn now_millis(&self) -> Result<u64, Error> {
            Ok(self.0)
        }
    }

    struct BrokenClock;
    impl TimeSource for BrokenClock {
        fn now_millis(&self) -> Result<u64, Error> {
            Err(Error::ClockUnavailable)
        }
    }

    struct CountingRandom(Cell<u8>);
    impl RandomSource for CountingRandom {
        fn fill(&self, buffer: &mut [u8; RANDOMNESS_BYTE_LEN]) -> Result<(), Error> {
            let n = self.0.get();
            buffer.fill(n);
            self.0.set(n + 1);
            Ok(())
        }
    }

    #[test]
    fn test_explicit_parts() {
        let generator = Generator::new(BrokenClock, NoRandom);

        let ulid = generator.generate(Some(1), Some(&[0; 10])).unwrap();
        assert_eq!(ulid, [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_timestamp_is_masked() {
        let generator = Generator::new(BrokenClock, NoRandom);

        let ulid = generator.generate(Some((1 << 48) | 5), Some(&[9; 10])).unwrap();
        assert_eq!(ulid[..6], [0, 0, 0, 0, 0, 5]);
        assert_eq!(ulid[6..], [9; 10]);
    }

    #[test]
    fn test_excess_randomness_is_ignored() {
        let generator = Generator::new(BrokenClock, NoRandom);
        let randomness: Vec<u8> = (1..=14).collect();

        let ulid = generator.generate(Some(0), Some(randomness.as_slice())).unwrap();
        assert_eq!(ulid[6..], randomness[..10]);
    }

    #[test]
    fn test_short_randomness_is_rejected() {
        let generator = Generator::new(FixedClock(1), CountingRandom(Cell::new(0)));

        assert_eq!(
            generator.generate(None, Some(&[0; 9])),
            Err(Error::InvalidRandomnessLength(9))
        );
        assert_eq!(generator.generate(None, Some(&[])), Err(Error::InvalidRandomnessLength(0)));
    }

    #[test]
    fn test_sources_are_used_when_parts_are_absent() {
        let generator = Generator::new(FixedClock(0x0102_0304_0506), CountingRandom(Cell::new(7)));

        let u1 = generator.generate(None, None).unwrap();
        let u2 = generator.generate(None, None).unwrap();

        assert_eq!(u1[..6], [1, 2, 3, 4, 5, 6]);
        assert_eq!(u1[6..], [7; 10]);
        assert_eq!(u2[6..], [8; 10]);
    }

    #[test]
    fn test_resource_failures_are_reported() {
        let generator = Generator::new(BrokenClock, CountingRandom(Cell::new(0)));
        assert_eq!(generator.generate(None, None), Err(Error::ClockUnavailable));
        assert_eq!(generator.generate(None, Some(&[0; 10])), Err(Error::ClockUnavailable));

        let generator = Generator::new(FixedClock(1), NoRandom);
        assert_eq!(generator.generate(None, None), Err(Error::EntropyUnavailable));
        assert_eq!(generator.generate(Some(1), None), Err(Error::EntropyUnavailable));
    }

    #[test]
    fn test_borrowed_sources() {
        let clock = FixedClock(3);
        let rng = CountingRandom(Cell::new(1));
        let generator = Generator::new(&clock, &rng);

        assert_eq!(generator.generate(None, None).unwrap()[5], 3);
        assert_eq!(rng.0.get(), 2);
    }

    #[test]
    fn test_source_accessors() {
        let generator = Generator::new(FixedClock(11), CountingRandom(Cell::new(4)));

        assert_eq!(generator.clock().now_millis(), Ok(11));
        generator.generate(Some(0), None).unwrap();
        assert_eq!(generator.random_source().0.get(), 5);
    }

    #[cfg(feature = "rand")]
    #[test]
    fn test_default_generator() {
        let u1 = generate(None, None).unwrap();
        let u2 = generate(None, None).unwrap();

        assert!(timestamp::unpack([u1[0], u1[1], u1[2], u1[3], u1[4], u1[5]]) > 1_704_067_200_000);
        assert_ne!(u1[6..], u2[6..]);
    }
}
