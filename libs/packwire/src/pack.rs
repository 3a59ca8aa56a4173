//! Variable-length integer packing.
//!
//! Every integer wider than a byte is written as a control byte followed by
//! the little-endian bytes of its absolute value. The low 4 bits of the
//! control byte hold the number of magnitude bytes, the high bit is set for
//! negative values. Leading zero bytes are never written, so `0` is just the
//! control byte `0x00`.
//!
//! Decoding only cares about the value, not the type it was written from.
//! Anything written from a narrower type can be read into a wider one, and a
//! wider type can be read into a narrower one as long as the value fits.

use std::io;

use crate::error::{Error, Result};
use crate::read::Read;

/// Bit of the control byte marking a negative value.
const SIGN_BIT: u8 = 0x80;
/// Bits of the control byte holding the magnitude byte count.
const SIZE_MASK: u8 = 0x0F;

/// Declares a type as supporting the packed integer format.
///
/// Implemented for all primitive integers up to 64 bits wide.
pub trait PackInt: Sized + Copy {
    /// Type name used in error messages.
    const NAME: &'static str;
    /// Whether the type can hold negative values.
    const SIGNED: bool;

    /// Splits the value into its absolute value and sign.
    fn into_wire(self) -> (u64, bool);

    /// Rebuilds a value from its absolute value and sign.
    ///
    /// Returns [`None`] if the value is out of range for `Self`.
    fn from_wire(magnitude: u64, negative: bool) -> Option<Self>;
}

/// Writes `x` in packed format.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write<T, W>(mut writer: W, x: T) -> Result<()>
where
    T: PackInt,
    W: io::Write,
{
    let (mut magnitude, negative) = x.into_wire();

    let mut buf = [0u8; 9];
    let mut size = 0usize;
    while magnitude != 0 {
        size += 1;
        #[allow(clippy::cast_possible_truncation)]
        let low = magnitude as u8;
        buf[size] = low;
        magnitude >>= 8;
    }

    // size is at most 8
    #[allow(clippy::cast_possible_truncation)]
    let ctrl = size as u8;
    buf[0] = if negative { ctrl | SIGN_BIT } else { ctrl };

    Ok(writer.write_all(&buf[..=size])?)
}

/// Reads a packed value into `T`.
///
/// Fails if the encoded value needs more bytes than `T` has or is otherwise
/// out of range for `T`.
///
/// # Errors
///
/// Returns [`Error::IntegerOverflow`] or [`Error::NegativeUnsigned`] if the
/// value doesn't fit `T`, or an I/O error if the reader runs out of data.
pub fn read<'de, T, R>(mut reader: R) -> Result<T>
where
    T: PackInt,
    R: Read<'de>,
{
    let [ctrl] = reader.read_bytes()?;
    let size = ctrl & SIZE_MASK;
    let negative = ctrl & SIGN_BIT != 0;

    // `from_wire` still range checks: a signed type of the same width has one
    // bit less for the magnitude.
    if usize::from(size) > size_of::<T>() {
        return Err(Error::IntegerOverflow { ty: T::NAME, size });
    }

    let mut magnitude = 0u64;
    for i in 0..size {
        let [b] = reader.read_bytes()?;
        magnitude |= u64::from(b) << (8 * u32::from(i));
    }

    T::from_wire(magnitude, negative).ok_or(if negative && !T::SIGNED {
        Error::NegativeUnsigned { ty: T::NAME }
    } else {
        Error::IntegerOverflow { ty: T::NAME, size }
    })
}

/// Returns the number of bytes [`write`] produces for `x`.
pub fn serialized_size<T: PackInt>(x: T) -> usize {
    let (magnitude, _) = x.into_wire();
    let bits = u64::BITS - magnitude.leading_zeros();
    1 + bits.div_ceil(8) as usize
}

/// Writes a collection length as a wire count.
pub(crate) fn write_count<W: io::Write>(writer: W, len: usize) -> Result<()> {
    write(writer, len)
}

/// Reads a wire count.
pub(crate) fn read_count<'de, R: Read<'de>>(reader: R) -> Result<usize> {
    read(reader)
}

macro_rules! impl_unsigned {
    ($($Ty:ty)*) => { $(
        impl PackInt for $Ty {
            const NAME: &'static str = stringify!($Ty);
            const SIGNED: bool = false;

            #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
            fn into_wire(self) -> (u64, bool) {
                (self as u64, false)
            }

            fn from_wire(magnitude: u64, negative: bool) -> Option<Self> {
                // a set sign bit is never valid for unsigned targets, even for 0
                if negative {
                    return None;
                }
                Self::try_from(magnitude).ok()
            }
        }
    )* };
}

macro_rules! impl_signed {
    ($($Ty:ty)*) => { $(
        impl PackInt for $Ty {
            const NAME: &'static str = stringify!($Ty);
            const SIGNED: bool = true;

            #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
            fn into_wire(self) -> (u64, bool) {
                (self.unsigned_abs() as u64, self < 0)
            }

            fn from_wire(magnitude: u64, negative: bool) -> Option<Self> {
                let value = i128::from(magnitude);
                let value = if negative { -value } else { value };
                Self::try_from(value).ok()
            }
        }
    )* };
}

impl_unsigned!(u8 u16 u32 u64 usize);
impl_signed!(i8 i16 i32 i64 isize);
