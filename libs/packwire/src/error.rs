//! Error handling types.
//!
//! Encoding and decoding share one error type. Composite values wrap the
//! errors of their elements with [`Error::context`], so the rendered message
//! reads innermost cause first and outermost container last.

use std::{fmt, io};

use serde_core::{de, ser};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error produced by an [`OpaqueMessage`](crate::OpaqueMessage)
/// implementation.
pub type MessageError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Potential errors to encounter when encoding or decoding binary data.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The error originated from the [`io::Write`] or [`io::Read`]
    /// implementation. Running out of data is reported as
    /// [`io::ErrorKind::UnexpectedEof`].
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A wire integer had more magnitude bytes than the target type can hold,
    /// or its value was outside the target's range.
    #[error("wire integer with {size} magnitude bytes does not fit into {ty}")]
    IntegerOverflow { ty: &'static str, size: u8 },
    /// A wire integer with the sign flag set was read into an unsigned type.
    #[error("negative wire integer cannot be stored in unsigned {ty}")]
    NegativeUnsigned { ty: &'static str },

    /// Tried to decode a [`bool`] but the byte was neither `'1'` nor `'0'`.
    #[error("invalid bool byte 0x{0:02x}, expected '0' or '1'")]
    InvalidBool(u8),
    /// Tried to decode a [`char`] but its code was not a unicode scalar value.
    #[error("invalid char code 0x{0:x}")]
    InvalidChar(u32),
    /// Tried to decode a [`str`] value but it contained invalid UTF-8.
    #[error("invalid utf-8 in data for string")]
    InvalidUtf8,
    /// The floating point text was malformed or not terminated by a space.
    #[error("invalid floating point text")]
    InvalidFloat,
    /// Tried to decode an [`Option`] with a flag byte other than `'0'` or
    /// `'1'`.
    #[error("invalid option flag byte 0x{0:02x}")]
    InvalidOption(u8),

    /// The count prefix of a fixed-size array differs from its length.
    #[error("array length mismatch: expected {expected}, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// An opaque message serialized to more bytes than its 32-bit length
    /// field can describe.
    #[error("opaque message of {0} bytes is too large")]
    MessageTooLarge(usize),
    /// An opaque message frame declared a length of zero.
    #[error("opaque message frame declared a length of zero")]
    EmptyMessage,
    /// The opaque message failed to serialize itself or to parse its bytes.
    #[error("opaque message failed: {0}")]
    Message(MessageError),

    /// A sequence or map tried to serialize itself without a length hint.
    #[error("sequences and maps must provide a length hint")]
    LengthRequired,
    /// A type tried to use [`de::Deserializer::deserialize_any`].
    #[error("types deserializing via any are unsupported")]
    AnyUnsupported,
    /// A slice had bytes left after the value was decoded.
    #[error("{0} trailing bytes past the end of the decoded value")]
    TrailingBytes(usize),
    /// Another reason provided by the object implementation.
    #[error("{0}")]
    Custom(String),

    /// An element failed while a composite value was being processed.
    #[error("{inner}\n   while {op} object of type {ty}")]
    Context {
        inner: Box<Error>,
        op: Op,
        ty: &'static str,
    },
}

/// The direction of the operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Encode,
    Decode,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Encode => "encoding",
            Self::Decode => "decoding",
        })
    }
}

impl Error {
    /// Wraps this error, noting that it happened while processing a value of
    /// type `ty`.
    #[must_use]
    pub fn context(self, op: Op, ty: &'static str) -> Self {
        log::trace!("{op} {ty} failed: {self}");
        Self::Context {
            inner: Box::new(self),
            op,
            ty,
        }
    }

    /// Gets the innermost error, skipping all [`Error::Context`] layers.
    pub fn root(&self) -> &Self {
        let mut err = self;
        while let Self::Context { inner, .. } = err {
            err = inner;
        }
        err
    }

    /// Iterates the type names of the [`Error::Context`] layers, innermost
    /// first.
    pub fn trail(&self) -> impl Iterator<Item = &'static str> {
        let mut trail = Vec::new();
        let mut err = self;
        while let Self::Context { inner, ty, .. } = err {
            trail.push(*ty);
            err = inner;
        }
        trail.into_iter().rev()
    }

    /// Whether the root cause is the stream running out of data.
    pub fn is_eof(&self) -> bool {
        matches!(self.root(), Self::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

/// Extension for attaching composite context to results.
pub(crate) trait ResultExt {
    #[must_use]
    fn context(self, op: Op, ty: &'static str) -> Self;
}

impl<T> ResultExt for Result<T> {
    fn context(self, op: Op, ty: &'static str) -> Self {
        self.map_err(|e| e.context(op, ty))
    }
}

impl ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::Custom(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::Custom(msg.to_string())
    }
}
