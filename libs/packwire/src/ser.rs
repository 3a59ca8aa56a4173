//! Exposes a serde serializer for this crate's binary format.
//!
//! Types that derive [`Serialize`](ser::Serialize) produce the same bytes
//! here as the equivalent [`Encode`](crate::Encode) implementations, so the
//! two can be mixed within one stream.

use std::io;

use serde_core::ser;

use crate::codec::float::{self, FloatFormat};
use crate::codec::primitive;
use crate::error::{Error, Op, Result, ResultExt as _};
use crate::pack::{self, PackInt};

/// Serializes a value to a [`Vec<u8>`].
///
/// The resulting buffer will have exactly the length required.
///
/// # Errors
///
/// Returns an error if the value cannot be represented in this format.
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + ser::Serialize,
{
    let mut buf = Vec::new();
    to_writer(&mut buf, value)?;
    Ok(buf)
}

/// Serializes a value to a [`io::Write`].
///
/// # Errors
///
/// Returns an error if the writer fails or the value cannot be represented in
/// this format.
pub fn to_writer<T, W>(writer: W, value: &T) -> Result<()>
where
    T: ?Sized + ser::Serialize,
    W: io::Write,
{
    value.serialize(Serializer::from_writer(writer))
}

/// A [`Serializer`] for this crate's binary format.
///
/// [`Serializer`]: serde_core::ser::Serializer
#[derive(Debug)]
pub struct Serializer<W> {
    writer: W,
    float: FloatFormat,
}

impl<W> Serializer<W> {
    /// Reborrows the serializer so it can be used for multiple
    /// [`serialize`](ser::Serialize::serialize) calls.
    ///
    /// This could be useful for manually serializing a sequence of elements.
    pub fn reborrow(&mut self) -> Serializer<&mut W> {
        Serializer {
            writer: &mut self.writer,
            float: self.float,
        }
    }

    /// Sets the format used for [`f32`] and [`f64`] values.
    #[must_use]
    pub fn with_float_format(mut self, float: FloatFormat) -> Self {
        self.float = float;
        self
    }
}

impl<W: io::Write> Serializer<W> {
    /// Creates a new serializer that writes a value to a [`io::Write`].
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer,
            float: FloatFormat::DEFAULT,
        }
    }

    /// Unwraps the serializer into its inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_byte(mut self, v: u8) -> Result<()> {
        Ok(self.writer.write_all(&[v])?)
    }

    fn write_packed<T: PackInt>(self, v: T) -> Result<()> {
        pack::write(self.writer, v)
    }
}

/// Error for a 128-bit value with more magnitude than a wire integer holds.
fn wide_overflow(ty: &'static str, magnitude: u128) -> Error {
    let bits = u128::BITS - magnitude.leading_zeros();
    // at most 16
    #[allow(clippy::cast_possible_truncation)]
    let size = bits.div_ceil(8) as u8;
    Error::IntegerOverflow { ty, size }
}

impl<W: io::Write> ser::Serializer for Serializer<W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SerializeList<W>;
    type SerializeTuple = SerializeTuple<W>;
    type SerializeTupleStruct = SerializeTuple<W>;
    type SerializeTupleVariant = SerializeTuple<W>;
    type SerializeMap = SerializeMap<W>;
    type SerializeStruct = SerializeTuple<W>;
    type SerializeStructVariant = SerializeTuple<W>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        primitive::write_bool(self.writer, v)
    }

    #[allow(clippy::cast_sign_loss)]
    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        self.write_byte(v as u8)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        self.write_packed(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        self.write_packed(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        self.write_packed(v)
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        let v = i64::try_from(v).map_err(|_| wide_overflow("i128", v.unsigned_abs()))?;
        self.write_packed(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        self.write_byte(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        self.write_packed(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        self.write_packed(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        self.write_packed(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        let v = u64::try_from(v).map_err(|_| wide_overflow("u128", v))?;
        self.write_packed(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        float::write_float(self.writer, v, self.float)
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        float::write_float(self.writer, v, self.float)
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        self.serialize_u32(v.into())
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        self.serialize_bytes(v.as_bytes())
    }

    fn serialize_bytes(mut self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        pack::write_count(&mut self.writer, v.len())?;
        Ok(self.writer.write_all(v)?)
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        self.serialize_bool(false)
    }

    fn serialize_some<T>(mut self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        self.reborrow().serialize_bool(true)?;
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.serialize_u32(variant_index)
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        mut self,
        name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        self.reborrow().serialize_u32(variant_index)?;
        value.serialize(self).context(Op::Encode, name)
    }

    fn serialize_seq(mut self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        let len = len.ok_or(Error::LengthRequired)?;
        pack::write_count(&mut self.writer, len)?;
        Ok(SerializeList(self))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(SerializeTuple::new(self, "tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(SerializeTuple::new(self, name))
    }

    fn serialize_tuple_variant(
        mut self,
        name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        self.reborrow().serialize_u32(variant_index)?;
        Ok(SerializeTuple::new(self, name))
    }

    fn serialize_map(mut self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        let len = len.ok_or(Error::LengthRequired)?;
        pack::write_count(&mut self.writer, len)?;
        Ok(SerializeMap(self))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(SerializeTuple::new(self, name))
    }

    fn serialize_struct_variant(
        mut self,
        name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        self.reborrow().serialize_u32(variant_index)?;
        Ok(SerializeTuple::new(self, name))
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Allows serializing a sequence of elements with a count prefix.
///
/// You shouldn't use this type directly. It is returned by [`Serializer`] as
/// needed.
pub struct SerializeList<W>(Serializer<W>);

/// Allows serializing a fixed sequence of elements without count prefix.
///
/// You shouldn't use this type directly. It is returned by [`Serializer`] as
/// needed.
pub struct SerializeTuple<W> {
    ser: Serializer<W>,
    name: &'static str,
}

/// Allows serializing key-value pairs with a count prefix.
///
/// You shouldn't use this type directly. It is returned by [`Serializer`] as
/// needed.
pub struct SerializeMap<W>(Serializer<W>);

impl<W: io::Write> SerializeTuple<W> {
    fn new(ser: Serializer<W>, name: &'static str) -> Self {
        Self { ser, name }
    }

    fn field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + ser::Serialize,
    {
        value
            .serialize(self.ser.reborrow())
            .context(Op::Encode, self.name)
    }
}

impl<W: io::Write> ser::SerializeSeq for SerializeList<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        value
            .serialize(self.0.reborrow())
            .context(Op::Encode, "sequence")
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<W: io::Write> ser::SerializeTuple for SerializeTuple<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        self.field(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<W: io::Write> ser::SerializeTupleStruct for SerializeTuple<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        self.field(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<W: io::Write> ser::SerializeTupleVariant for SerializeTuple<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        self.field(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<W: io::Write> ser::SerializeMap for SerializeMap<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        key.serialize(self.0.reborrow()).context(Op::Encode, "map")
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        value.serialize(self.0.reborrow()).context(Op::Encode, "map")
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<W: io::Write> ser::SerializeStruct for SerializeTuple<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        self.field(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}

impl<W: io::Write> ser::SerializeStructVariant for SerializeTuple<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + ser::Serialize,
    {
        self.field(value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(())
    }
}
