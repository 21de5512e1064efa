//! # ULID Codec
//!
//! This crate implements the binary format of ULIDs (Universally Unique
//! Lexicographically Sortable Identifiers): generating the 128-bit identifier
//! out of a 48-bit millisecond timestamp and 80 bits of randomness, and converting
//! losslessly between its 16 byte binary form and its 26 character Crockford Base32 text.
//!
//! ## Binary Layout
//!
//! | Bytes    | Content                                 |
//! |----------|-----------------------------------------|
//! | `0..6`   | timestamp, big-endian, 48-bit unsigned  |
//! | `6..16`  | randomness                              |
//!
//! Timestamps beyond 48 bits are truncated.
//!
//! ## Generating ULIDs
//!
//! ```
//! # fn main() -> Result<(), ulid_codec::Error> {
//! // Current time and fresh randomness
//! # #[cfg(feature = "rand")]
//! let a = ulid_codec::generate(None, None)?;
//!
//! // Explicit timestamp and randomness
//! let b = ulid_codec::generate(Some(1), Some(&[0; 10]))?;
//!
//! assert_eq!(b, [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
//! # Ok(()) }
//! ```
//!
//! Generation keeps no state between calls, so ULIDs generated within the same
//! millisecond are not ordered among each other.
//!
//! ## Encoding and Decoding
//!
//! ```
//! # fn main() -> Result<(), ulid_codec::Error> {
//! let text = ulid_codec::encode(&[0xFF; 16])?;
//! assert_eq!(text, "7ZZZZZZZZZZZZZZZZZZZZZZZZZ");
//!
//! // Decoding ignores case
//! assert_eq!(ulid_codec::decode("7zzzzzzzzzzzzzzzzzzzzzzzzz")?, [0xFF; 16]);
//!
//! assert_eq!(ulid_codec::extract_timestamp(&[0xFF; 16])?, (1 << 48) - 1);
//! # Ok(()) }
//! ```
//!
//! The decoder follows Crockford's equivalences: `I` and `L` read as `1`, `O`
//! reads as `0`. `U` and anything outside the alphabet is rejected.
//!
//! The decoder does not check that the first character is at most `7`. The two
//! bits above the 128-bit payload are silently dropped, so `"ZZZ…"` decodes
//! like `"7ZZ…"`. [`decode_strict`] and [`validate`] reject such strings.
//!
//! ## Host Functions
//!
//! [`Function`] exposes `ulid_new`, `ulid_encode`, `ulid_decode` and
//! `ulid_to_timestamp` over dynamically typed [`Value`]s, with `NULL`
//! propagation and error messages meant for a query engine.
//!
//! ## Feature Flags
//!
//! - **`rand`**: Utilizes the `rand` crate as the source for random numbers, enabled by default.
//!   Without it, randomness must be passed explicitly or a [`RandomSource`] injected.
//! - **`serde`**: Provides support for serialization and deserialization of [`Ulid`] via `Serde`, optional.
//! - **`tracing`**: Emits trace spans for generation and host function calls, optional.
//!

mod alphabet;
mod base32;
mod entropy;
mod error;
mod function;
mod generator;
#[cfg(feature = "serde")]
mod serde;
mod timestamp;
mod ulid;
mod util;

pub use base32::{canonicalize_str as canonicalize, decode, decode_strict, encode, encode_to_buffer, validate_str as validate};
#[cfg(feature = "rand")]
pub use entropy::{OsRandom, SeededRandom};
pub use entropy::{NoRandom, PlatformRandom, RandomSource, SystemClock, TimeSource};
pub use error::{Error, ErrorCategory};
pub use function::{Function, FunctionError, FunctionErrorKind, UnknownFunction, Value, ValueType};
pub use generator::{generate, Generator};
pub use timestamp::{extract as extract_timestamp, pack as pack_timestamp, unpack as unpack_timestamp};
pub use ulid::Ulid;

/// Length of the timestamp part in bytes.
pub const TIMESTAMP_BYTE_LEN: usize = 6;
/// Length of the randomness part in bytes.
pub const RANDOMNESS_BYTE_LEN: usize = 10;
/// Length of a binary ULID.
pub const ULID_BYTE_LEN: usize = TIMESTAMP_BYTE_LEN + RANDOMNESS_BYTE_LEN;
/// Length of a ULID string.
pub const ULID_STR_LEN: usize = 26;

const TIMESTAMP_BITS: u32 = 48;
/// Largest timestamp a ULID can hold.
pub const TIMESTAMP_MAX: u64 = (1 << TIMESTAMP_BITS) - 1;
