//! # Packwire
//!
//! Compact binary encoding for in-memory values. The format is not
//! self-describing: the type being decoded alone decides how the next bytes
//! are interpreted, so a reader has to ask for exactly the types the writer
//! wrote, in the same order.
//!
//! The building blocks of the format are:
//!
//! - `byte`: a single raw byte
//! - `flag`: a single ASCII byte, `'1'` for true and `'0'` for false
//! - `packed`: a control byte followed by the minimal little-endian bytes of
//!   the absolute value, see [`pack`]
//! - `text`: decimal floating point text terminated by a space, see
//!   [`float`]
//! - `list`: a `packed` count followed by that many values
//! - `tuple`: a fixed number of values without count
//! - `blob`: a 4-byte little-endian length followed by opaque bytes
//!
//! Rust types map to these as follows:
//!
//! - `byte`: [`u8`] and [`i8`]
//! - `flag`: [`bool`]
//! - `packed`: all other integers up to 64 bits, and [`char`] by its code
//! - `text`: [`f32`] and [`f64`]
//! - `list`: [`str`] (by bytes), [`WideString`] (by chars), slices, [`Vec`],
//!   [`VecDeque`](std::collections::VecDeque), fixed-size arrays, maps as a
//!   list of key-value pairs and sets. Hash-based maps and sets are written
//!   in sorted order.
//! - `tuple`: tuples, [`Complex`](num_complex::Complex) as real and
//!   imaginary part, and [`Option`] as a `flag` followed by the value if
//!   present
//! - `blob`: [`OpaqueMessage`] implementations wrapped in [`Message`]
//!
//! Types implement [`Encode`] and [`Decode`] to take part. Alternatively,
//! types that implement serde's traits can be written with [`ser`] and read
//! with [`de`], which produce the same bytes for the same shapes.
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! let map = BTreeMap::from([(1u32, "one".to_owned()), (2, "two".to_owned())]);
//! let buf = packwire::to_vec(&map)?;
//! assert_eq!(buf[..2], [0x01, 0x02]);
//!
//! let back: BTreeMap<u32, String> = packwire::from_slice(&buf)?;
//! assert_eq!(back, map);
//! # Ok::<(), packwire::Error>(())
//! ```

use std::io;

pub mod byte_order;
mod capability;
mod codec;
pub mod de;
mod error;
mod message;
pub mod pack;
mod read;
pub mod ser;


pub use capability::{
    AsKeyValue, Enumerable, KeyValue, SliceCursor, encode_enumerable, encode_key_value,
};
pub use codec::float::{self, FloatFormat, FloatText};
pub use codec::{Decode, Encode, WideString};
pub use error::{Error, MessageError, Op, Result};
pub use message::{Message, OpaqueMessage, decode_message, encode_message};
pub use read::{IoRead, Read};

/// Encodes a value to a [`Vec<u8>`].
///
/// The resulting buffer will have exactly the length required.
///
/// # Errors
///
/// Returns an error if the value cannot be represented in this format.
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: Encode + ?Sized,
{
    let mut buf = Vec::new();
    value.encode(&mut buf)?;
    Ok(buf)
}

/// Encodes a value to a [`io::Write`].
///
/// # Errors
///
/// Returns an error if the writer fails or the value cannot be represented in
/// this format.
pub fn to_writer<T, W>(mut writer: W, value: &T) -> Result<()>
where
    T: Encode + ?Sized,
    W: io::Write,
{
    value.encode(&mut writer)
}

/// Decodes a value from a byte slice.
///
/// In addition to other decoding errors, this returns
/// [`Error::TrailingBytes`] if the slice isn't fully consumed. To decode
/// several values from one slice, call [`Decode::decode`] with a
/// `&mut &[u8]` instead.
///
/// # Errors
///
/// Returns an error if the data is truncated or invalid for `T`.
pub fn from_slice<T: Decode>(mut buf: &[u8]) -> Result<T> {
    let value = T::decode(&mut buf)?;

    if !buf.is_empty() {
        return Err(Error::TrailingBytes(buf.len()));
    }

    Ok(value)
}

/// Decodes a value from a [`io::Read`].
///
/// The reader may still have bytes available when this function returns
/// successfully. To decode several values from one reader, wrap it in an
/// [`IoRead`] once and call [`Decode::decode`] repeatedly, since a byte
/// peeked while reading floats is held by the wrapper.
///
/// # Errors
///
/// Returns an error if the reader fails, or the data is truncated or invalid
/// for `T`.
pub fn from_reader<T, R>(reader: R) -> Result<T>
where
    T: Decode,
    R: io::Read,
{
    T::decode(&mut IoRead::new(reader))
}

/// Decodes a value into `target`.
///
/// If decoding fails, `target` is reset to its default value so it never
/// holds partially decoded data.
///
/// # Errors
///
/// Returns an error if the reader fails, or the data is truncated or invalid
/// for `T`.
pub fn decode_into<'de, T, R>(target: &mut T, mut reader: R) -> Result<()>
where
    T: Decode + Default,
    R: Read<'de>,
{
    match T::decode(&mut reader) {
        Ok(value) => {
            *target = value;
            Ok(())
        },
        Err(err) => {
            log::debug!("resetting target after failed decode: {err}");
            *target = T::default();
            Err(err)
        },
    }
}
