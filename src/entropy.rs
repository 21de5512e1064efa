use std::time::SystemTime;

use crate::{Error, RANDOMNESS_BYTE_LEN};

/// A source of the current time.
///
/// This abstraction allows you to plug in the system clock or a fixed clock in tests.
///
/// # Example
///
/// ```
/// use ulid_codec::{Error, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn now_millis(&self) -> Result<u64, Error> {
///         Ok(1234)
///     }
/// }
///
/// assert_eq!(FixedTime.now_millis(), Ok(1234));
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockUnavailable`] if the clock cannot be read.
    fn now_millis(&self) -> Result<u64, Error>;
}

/// A source of the 80 random bits of a ULID.
///
/// # Example
///
/// ```
/// use ulid_codec::{Error, RandomSource};
///
/// struct Zeros;
/// impl RandomSource for Zeros {
///     fn fill(&self, buffer: &mut [u8; 10]) -> Result<(), Error> {
///         buffer.fill(0);
///         Ok(())
///     }
/// }
/// ```
pub trait RandomSource {
    /// Fills the buffer with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if no random bytes can be read.
    fn fill(&self, buffer: &mut [u8; RANDOMNESS_BYTE_LEN]) -> Result<(), Error>;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_millis(&self) -> Result<u64, Error> {
        (**self).now_millis()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    fn fill(&self, buffer: &mut [u8; RANDOMNESS_BYTE_LEN]) -> Result<(), Error> {
        (**self).fill(buffer)
    }
}

/// The wall clock of the system.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    /// Fails for clocks set before 1970 rather than returning a wrong value.
    fn now_millis(&self) -> Result<u64, Error> {
        let since_epoch = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|_| Error::ClockUnavailable)?;
        u64::try_from(since_epoch.as_millis()).map_err(|_| Error::ClockUnavailable)
    }
}

/// A random source which never produces any bytes.
///
/// Generating a ULID without explicit randomness always fails with this source.
/// It is the platform source when the `rand` feature is disabled.
#[derive(Default, Clone, Copy, Debug)]
pub struct NoRandom;

impl RandomSource for NoRandom {
    fn fill(&self, _buffer: &mut [u8; RANDOMNESS_BYTE_LEN]) -> Result<(), Error> {
        Err(Error::EntropyUnavailable)
    }
}

#[cfg(feature = "rand")]
mod rng {
    use std::{
        sync::{Mutex, OnceLock},
        time::SystemTime,
    };

    use rand::{
        rngs::{OsRng, StdRng},
        RngCore as _, SeedableRng as _,
    };

    use super::RandomSource;
    use crate::{Error, RANDOMNESS_BYTE_LEN};

    /// Cryptographically strong random source backed by the operating system.
    ///
    /// A failed read is reported as [`Error::EntropyUnavailable`], it is never
    /// replaced by weaker randomness.
    #[derive(Default, Clone, Copy, Debug)]
    pub struct OsRandom;

    impl RandomSource for OsRandom {
        fn fill(&self, buffer: &mut [u8; RANDOMNESS_BYTE_LEN]) -> Result<(), Error> {
            OsRng.try_fill_bytes(buffer).map_err(|_| Error::EntropyUnavailable)
        }
    }

    static SEEDED: OnceLock<Mutex<StdRng>> = OnceLock::new();

    /// Pseudo-random source seeded once per process.
    ///
    /// Only meant for platforms without an operating system entropy source.
    /// The generator is seeded from the clock and the process id, so it is far
    /// weaker than [`OsRandom`] and ULIDs generated this way carry a weaker
    /// uniqueness guarantee across processes. All threads share the one
    /// generator behind a mutex.
    #[derive(Default, Clone, Copy, Debug)]
    pub struct SeededRandom;

    impl SeededRandom {
        #[allow(clippy::cast_possible_truncation)]
        fn generator() -> &'static Mutex<StdRng> {
            SEEDED.get_or_init(|| {
                #[cfg(feature = "tracing")]
                tracing::warn!("no OS entropy source, seeding a pseudo-random generator from the clock");

                let seed = SystemTime::now()
                    .duration_since(SystemTime::UNIX_EPOCH)
                    .map_or(0, |d| d.as_nanos() as u64);
                Mutex::new(StdRng::seed_from_u64(seed ^ u64::from(std::process::id())))
            })
        }
    }

    impl RandomSource for SeededRandom {
        fn fill(&self, buffer: &mut [u8; RANDOMNESS_BYTE_LEN]) -> Result<(), Error> {
            let mut rng = Self::generator().lock().map_err(|_| Error::EntropyUnavailable)?;
            rng.fill_bytes(buffer);
            drop(rng);
            Ok(())
        }
    }
}

#[cfg(feature = "rand")]
pub use rng::{OsRandom, SeededRandom};

/// The random source chosen for the target platform at build time.
#[cfg(all(feature = "rand", any(unix, windows, target_os = "wasi")))]
pub type PlatformRandom = OsRandom;

/// The random source chosen for the target platform at build time.
#[cfg(all(feature = "rand", not(any(unix, windows, target_os = "wasi"))))]
pub type PlatformRandom = SeededRandom;

/// The random source chosen for the target platform at build time.
#[cfg(not(feature = "rand"))]
pub type PlatformRandom = NoRandom;
