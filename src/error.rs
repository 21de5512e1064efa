use std::fmt;

/// Errors that can occur when generating, encoding or decoding ULIDs.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Error {
    /// The binary ULID does not have exactly 16 bytes. Carries the actual length.
    InvalidByteLength(usize),
    /// The ULID string does not have exactly 26 characters. Carries the actual length.
    InvalidTextLength(usize),
    /// The ULID string contains a character outside the Crockford alphabet.
    InvalidChar,
    /// The first character of the ULID string encodes more than 128 bits.
    ///
    /// Only reported by the strict decoder and by [`validate`](crate::validate).
    Overflow,
    /// The caller supplied randomness is shorter than 10 bytes. Carries the actual length.
    InvalidRandomnessLength(usize),
    /// The current time could not be read from the clock.
    ClockUnavailable,
    /// No random bytes could be read from the entropy source.
    EntropyUnavailable,
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Wrong byte or character count.
    Length,
    /// A character or value that cannot be represented.
    Content,
    /// The clock or the entropy source failed.
    Resource,
}

impl Error {
    /// Returns the category of this error.
    ///
    /// # Example
    ///
    /// ```
    /// use ulid_codec::{Error, ErrorCategory};
    ///
    /// assert_eq!(Error::InvalidChar.category(), ErrorCategory::Content);
    /// assert_eq!(Error::InvalidTextLength(25).category(), ErrorCategory::Length);
    /// ```
    #[must_use]
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::InvalidByteLength(_) | Self::InvalidTextLength(_) | Self::InvalidRandomnessLength(_) => {
                ErrorCategory::Length
            }
            Self::InvalidChar | Self::Overflow => ErrorCategory::Content,
            Self::ClockUnavailable | Self::EntropyUnavailable => ErrorCategory::Resource,
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::InvalidByteLength(len) => write!(f, "invalid byte length {len}, expected 16"),
            Self::InvalidTextLength(len) => write!(f, "invalid text length {len}, expected 26"),
            Self::InvalidChar => write!(f, "string contains an invalid character"),
            Self::Overflow => write!(f, "string encodes a value larger than 128 bits"),
            Self::InvalidRandomnessLength(len) => {
                write!(f, "invalid byte length {len} for randomness, expected at least 10")
            }
            Self::ClockUnavailable => write!(f, "failed to get current time"),
            Self::EntropyUnavailable => write!(f, "failed to get random bytes"),
        }
    }
}
