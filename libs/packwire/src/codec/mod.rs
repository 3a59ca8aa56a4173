//! The [`Encode`] and [`Decode`] traits and their implementations.
//!
//! Which rule applies to a value is decided entirely by its type. Nothing
//! about the type is written to the stream, so a reader has to decode the
//! exact same sequence of types the writer encoded.

use std::io;

use crate::error::{Op, Result};
use crate::read::Read;

mod collections;
mod complex;
pub mod float;
pub(crate) mod primitive;
mod text;

pub use text::WideString;

/// Upper bound for elements to preallocate when decoding sequences.
///
/// Counts come from the stream and may be garbage, so this keeps corrupt
/// input from requesting huge allocations up front.
const PREALLOC_LIMIT: usize = 0x400;

/// A type that can be written in this crate's binary format.
pub trait Encode {
    /// Writes `self` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails or the value cannot be
    /// represented.
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()>;

    /// Writes a slice of values without count prefix.
    ///
    /// Single-byte types override this to write the slice as one block.
    #[doc(hidden)]
    fn encode_slice<W: io::Write>(items: &[Self], writer: &mut W) -> Result<()>
    where
        Self: Sized,
    {
        items.iter().try_for_each(|item| item.encode(writer))
    }
}

/// A type that can be read from this crate's binary format.
pub trait Decode: Sized {
    /// Reads a value from `reader`, consuming exactly the bytes that
    /// [`Encode::encode`] wrote for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails, runs out of data, or the data
    /// is invalid for `Self`.
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self>;

    /// Reads `len` values without count prefix.
    ///
    /// Single-byte types override this to read the values as one block.
    #[doc(hidden)]
    fn decode_vec<'de, R: Read<'de>>(reader: &mut R, len: usize) -> Result<Vec<Self>> {
        let mut out = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            out.push(Self::decode(reader)?);
        }
        Ok(out)
    }
}

/// Runs an encode step of a composite, attaching `ty` to any error.
pub(crate) fn encoding<F>(ty: &'static str, f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    f().map_err(|e| e.context(Op::Encode, ty))
}

/// Runs a decode step of a composite, attaching `ty` to any error.
pub(crate) fn decoding<T, F>(ty: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f().map_err(|e| e.context(Op::Decode, ty))
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        (**self).encode(writer)
    }
}

impl<T: Encode + ?Sized> Encode for &mut T {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        (**self).encode(writer)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        (**self).encode(writer)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        T::decode(reader).map(Box::new)
    }
}
