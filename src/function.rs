//! Scalar functions for a host query engine.
//!
//! The host engine passes dynamically typed [`Value`]s and receives one
//! [`Value`] or a [`FunctionError`] back. Registration with the engine and the
//! marshalling of its native values are left to the host.
//!
//! A `NULL` argument always produces a `NULL` result, it is never an error.

use std::{fmt, str::FromStr};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    base32,
    entropy::{PlatformRandom, RandomSource, SystemClock, TimeSource},
    timestamp, Error, Generator,
};

/// A dynamically typed value exchanged with the host engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns the type of the value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Integer(_) => ValueType::Integer,
            Self::Real(_) => ValueType::Real,
            Self::Text(_) => ValueType::Text,
            Self::Blob(_) => ValueType::Blob,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Real(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Blob(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self::Blob(bytes.to_vec())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Storage classes of [`Value`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "NULL",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
        };
        f.write_str(name)
    }
}

/// The scalar functions offered to the host engine.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Function {
    /// `ulid_new([timestamp INTEGER [, randomness BLOB]]) -> BLOB`
    New,
    /// `ulid_encode(ulid BLOB) -> TEXT`
    Encode,
    /// `ulid_decode(ulid TEXT) -> BLOB`
    Decode,
    /// `ulid_to_timestamp(ulid BLOB) -> INTEGER`
    ToTimestamp,
}

impl Function {
    /// All functions, in registration order.
    pub const ALL: [Self; 4] = [Self::New, Self::Encode, Self::Decode, Self::ToTimestamp];

    /// SQL name of the function.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::New => "ulid_new",
            Self::Encode => "ulid_encode",
            Self::Decode => "ulid_decode",
            Self::ToTimestamp => "ulid_to_timestamp",
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::New => "ULID_NEW",
            Self::Encode => "ULID_ENCODE",
            Self::Decode => "ULID_DECODE",
            Self::ToTimestamp => "ULID_TO_TIMESTAMP",
        }
    }

    /// Smallest number of arguments accepted.
    #[must_use]
    pub const fn min_args(self) -> usize {
        match self {
            Self::New => 0,
            Self::Encode | Self::Decode | Self::ToTimestamp => 1,
        }
    }

    /// Largest number of arguments accepted.
    #[must_use]
    pub const fn max_args(self) -> usize {
        match self {
            Self::New => 2,
            Self::Encode | Self::Decode | Self::ToTimestamp => 1,
        }
    }

    /// Whether equal arguments always produce equal results.
    ///
    /// Only `ulid_new` reads the clock and the random source.
    #[must_use]
    pub const fn is_deterministic(self) -> bool {
        !matches!(self, Self::New)
    }

    /// Invokes the function with the system clock and the platform random source.
    ///
    /// # Errors
    ///
    /// See [`Function::call_with`].
    ///
    /// # Example
    ///
    /// ```
    /// use ulid_codec::{Function, Value};
    ///
    /// let blob = Function::New.call(&[Value::Integer(1), Value::Blob(vec![0; 10])])?;
    /// let text = Function::Encode.call(&[blob])?;
    ///
    /// assert_eq!(text, Value::Text("00000000010000000000000000".into()));
    /// assert_eq!(Function::Decode.call(&[Value::Null])?, Value::Null);
    /// # Ok::<(), ulid_codec::FunctionError>(())
    /// ```
    pub fn call(self, args: &[Value]) -> Result<Value, FunctionError> {
        self.call_with(&Generator::<SystemClock, PlatformRandom>::default(), args)
    }

    /// Invokes the function, generating ULIDs with the given generator.
    ///
    /// # Errors
    ///
    /// - a wrong number of arguments,
    /// - an argument of the wrong type,
    /// - an argument the codec rejects, or a failing clock or random source.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, generator, args), fields(function = self.name()))
    )]
    pub fn call_with<T: TimeSource, R: RandomSource>(
        self,
        generator: &Generator<T, R>,
        args: &[Value],
    ) -> Result<Value, FunctionError> {
        if args.len() < self.min_args() {
            return Err(self.error(FunctionErrorKind::MissingArgument));
        }
        if args.len() > self.max_args() {
            return Err(self.error(FunctionErrorKind::TooManyArguments(args.len())));
        }

        match self {
            Self::New => self.ulid_new(generator, args),
            Self::Encode => match self.blob_arg(&args[0])? {
                None => Ok(Value::Null),
                Some(bytes) => Ok(Value::Text(base32::encode(bytes).map_err(|e| self.invalid(e))?)),
            },
            Self::Decode => match &args[0] {
                Value::Null => Ok(Value::Null),
                Value::Text(text) => Ok(Value::Blob(base32::decode(text).map_err(|e| self.invalid(e))?.to_vec())),
                _ => Err(self.type_mismatch(ValueType::Text, None)),
            },
            Self::ToTimestamp => match self.blob_arg(&args[0])? {
                None => Ok(Value::Null),
                Some(bytes) => {
                    let ts = timestamp::extract(bytes).map_err(|e| self.invalid(e))?;
                    // 48 bits always fit
                    #[allow(clippy::cast_possible_wrap)]
                    let ts = ts as i64;
                    Ok(Value::Integer(ts))
                }
            },
        }
    }

    fn ulid_new<T: TimeSource, R: RandomSource>(
        self,
        generator: &Generator<T, R>,
        args: &[Value],
    ) -> Result<Value, FunctionError> {
        let timestamp = match args.first() {
            None => None,
            Some(Value::Null) => return Ok(Value::Null),
            // Host integers are signed, the bit pattern is kept.
            #[allow(clippy::cast_sign_loss)]
            Some(&Value::Integer(ts)) => Some(ts as u64),
            Some(_) => return Err(self.type_mismatch(ValueType::Integer, Some("timestamp"))),
        };

        let randomness = match args.get(1) {
            None => None,
            Some(Value::Null) => return Ok(Value::Null),
            Some(Value::Blob(bytes)) => Some(bytes.as_slice()),
            Some(_) => return Err(self.type_mismatch(ValueType::Blob, Some("randomness"))),
        };

        let ulid = generator.generate(timestamp, randomness).map_err(|e| self.invalid(e))?;
        Ok(Value::Blob(ulid.to_vec()))
    }

    #[allow(clippy::missing_const_for_fn)]
    fn blob_arg(self, arg: &Value) -> Result<Option<&[u8]>, FunctionError> {
        match arg {
            Value::Null => Ok(None),
            Value::Blob(bytes) => Ok(Some(bytes.as_slice())),
            _ => Err(self.type_mismatch(ValueType::Blob, None)),
        }
    }

    const fn error(self, kind: FunctionErrorKind) -> FunctionError {
        FunctionError { function: self, kind }
    }

    const fn invalid(self, error: Error) -> FunctionError {
        self.error(FunctionErrorKind::Invalid(error))
    }

    const fn type_mismatch(self, expected: ValueType, argument: Option<&'static str>) -> FunctionError {
        self.error(FunctionErrorKind::TypeMismatch { expected, argument })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = UnknownFunction;

    /// Looks a function up by its SQL name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|function| function.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownFunction)
    }
}

/// The name passed to [`Function::from_str`] names no function.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct UnknownFunction;

impl std::error::Error for UnknownFunction {}

impl fmt::Display for UnknownFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown function")
    }
}

/// Why a function call failed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum FunctionErrorKind {
    /// Fewer arguments than the function requires.
    MissingArgument,
    /// More arguments than the function accepts. Carries the actual count.
    TooManyArguments(usize),
    /// An argument has the wrong type.
    TypeMismatch {
        expected: ValueType,
        /// Name of the argument, for functions taking more than one.
        argument: Option<&'static str>,
    },
    /// The codec or the generator rejected the input or failed.
    Invalid(Error),
}

/// A failed function call, reported to the host engine.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct FunctionError {
    function: Function,
    kind: FunctionErrorKind,
}

impl FunctionError {
    /// The function that failed.
    #[must_use]
    pub const fn function(&self) -> Function {
        self.function
    }

    #[must_use]
    pub const fn kind(&self) -> FunctionErrorKind {
        self.kind
    }
}

impl std::error::Error for FunctionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            FunctionErrorKind::Invalid(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for FunctionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.function.tag())?;

        match self.kind {
            FunctionErrorKind::MissingArgument => f.write_str("No argument"),
            FunctionErrorKind::TooManyArguments(n) => write!(f, "Too many arguments: {n}"),
            FunctionErrorKind::TypeMismatch { expected, argument: None } => write!(f, "{expected} value expected"),
            FunctionErrorKind::TypeMismatch {
                expected,
                argument: Some(argument),
            } => write!(f, "{expected} value expected for {argument}"),
            FunctionErrorKind::Invalid(error) => {
                let message = match error {
                    Error::InvalidByteLength(_) => "Invalid byte length",
                    Error::InvalidTextLength(_) => "Invalid text length",
                    Error::InvalidChar => "Invalid character",
                    Error::Overflow => "Value exceeds 128 bits",
                    Error::InvalidRandomnessLength(_) => "Invalid byte length for randomness",
                    Error::ClockUnavailable => "Internal error: failed to get current time",
                    Error::EntropyUnavailable => "Internal error: failed to get random bytes",
                };
                f.write_str(message)
            }
        }
    }
}
