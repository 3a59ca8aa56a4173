//! Exposes a serde deserializer for this crate's binary format.

use std::io;

use serde_core::de;

use crate::codec::float::{self, FloatFormat};
use crate::codec::primitive;
use crate::error::{Error, Op, Result, ResultExt as _};
use crate::pack::{self, PackInt};
use crate::read::{IoRead, Read};

/// Deserializes a value from a byte slice.
///
/// In addition to other deserialization errors, this returns
/// [`Error::TrailingBytes`] if the slice isn't fully consumed. If you want to
/// use the rest of the slice instead, refer to [`Deserializer::from_slice`].
///
/// # Errors
///
/// Returns an error if the data is truncated or invalid for `T`.
pub fn from_slice<'de, T>(buf: &'de [u8]) -> Result<T>
where
    T: de::Deserialize<'de>,
{
    let mut de = Deserializer::from_slice(buf);
    let value = T::deserialize(&mut de)?;

    if !de.remainder().is_empty() {
        return Err(Error::TrailingBytes(de.remainder().len()));
    }

    Ok(value)
}

/// Deserializes a value from a [`io::Read`].
///
/// The reader may still have bytes available when this function returns
/// successfully.
///
/// # Errors
///
/// Returns an error if the reader fails, or the data is truncated or invalid
/// for `T`.
pub fn from_reader<T, R>(reader: R) -> Result<T>
where
    T: de::DeserializeOwned,
    R: io::Read,
{
    T::deserialize(&mut Deserializer::from_reader(reader))
}

/// A [`Deserializer`] for this crate's binary format. The trait is only
/// implemented by `&mut`.
///
/// [`Deserializer`]: serde_core::de::Deserializer
#[derive(Debug)]
pub struct Deserializer<R> {
    reader: R,
    float: FloatFormat,
}

impl<'de, R: Read<'de>> Deserializer<R> {
    /// Creates a new deserializer that reads a value from a [`Read`].
    ///
    /// When reading from a slice, using [`Self::from_slice`] may be clearer.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            float: FloatFormat::DEFAULT,
        }
    }

    /// Sets the format used for [`f32`] and [`f64`] values.
    #[must_use]
    pub fn with_float_format(mut self, float: FloatFormat) -> Self {
        self.float = float;
        self
    }

    fn read_packed<T: PackInt>(&mut self) -> Result<T> {
        pack::read(&mut self.reader)
    }
}

impl<'de> Deserializer<&'de [u8]> {
    /// Creates a new deserializer that reads a value from a slice.
    ///
    /// This is useful over [`from_slice`] when you want the remainder of the
    /// slice instead of an error or want to deserialize a sequence of values
    /// manually.
    pub fn from_slice(buf: &'de [u8]) -> Self {
        Self::new(buf)
    }

    /// Gets the remaining unread part of the slice.
    pub fn remainder(&self) -> &'de [u8] {
        self.reader
    }
}

impl<R: io::Read> Deserializer<IoRead<R>> {
    /// Creates a new deserializer that reads a value from a [`io::Read`].
    ///
    /// If you're working with a byte slice, it is more efficient to use
    /// [`from_slice`].
    pub fn from_reader(reader: R) -> Self {
        Self::new(IoRead::new(reader))
    }

    /// Gets a reference to the inner reader.
    pub fn as_reader(&mut self) -> &mut R {
        self.reader.get_mut()
    }

    /// Unwraps the deserializer into its inner reader.
    pub fn into_reader(self) -> R {
        self.reader.into_inner()
    }
}

// implemented by mut so nested Deserialize calls don't add another layer of
// indirection each
impl<'de, R: Read<'de>> de::Deserializer<'de> for &mut Deserializer<R> {
    type Error = Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::AnyUnsupported)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bool(primitive::read_bool(&mut self.reader)?)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let [b] = self.reader.read_bytes()?;
        visitor.visit_i8(b as i8)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i16(self.read_packed()?)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i32(self.read_packed()?)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i64(self.read_packed()?)
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let v: i64 = self.read_packed()?;
        visitor.visit_i128(v.into())
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let [b] = self.reader.read_bytes()?;
        visitor.visit_u8(b)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u16(self.read_packed()?)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u32(self.read_packed()?)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u64(self.read_packed()?)
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let v: u64 = self.read_packed()?;
        visitor.visit_u128(v.into())
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f32(float::read_float(&mut self.reader, self.float)?)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f64(float::read_float(&mut self.reader, self.float)?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_char(primitive::read_char(&mut self.reader)?)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let len = pack::read_count(&mut self.reader)?;
        match self.reader.try_read_bytes_borrow(len) {
            Some(v) => {
                let v = std::str::from_utf8(v?).map_err(|_| Error::InvalidUtf8)?;
                visitor.visit_borrowed_str(v)
            },
            None => self.reader.read_byte_view(len, |v| {
                let v = std::str::from_utf8(v).map_err(|_| Error::InvalidUtf8)?;
                visitor.visit_str(v)
            }),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let len = pack::read_count(&mut self.reader)?;
        let v = self.reader.read_byte_vec(len)?;
        let v = String::from_utf8(v).map_err(|_| Error::InvalidUtf8)?;
        visitor.visit_string(v)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let len = pack::read_count(&mut self.reader)?;
        match self.reader.try_read_bytes_borrow(len) {
            Some(v) => visitor.visit_borrowed_bytes(v?),
            None => self.reader.read_byte_view(len, |v| visitor.visit_bytes(v)),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let len = pack::read_count(&mut self.reader)?;
        let v = self.reader.read_byte_vec(len)?;
        visitor.visit_byte_buf(v)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        match self.reader.read_bytes()? {
            [primitive::FALSE] => visitor.visit_none(),
            [primitive::TRUE] => visitor.visit_some(self),
            [b] => Err(Error::InvalidOption(b)),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let len = pack::read_count(&mut self.reader)?;
        visitor.visit_seq(ListAccess::new(self, len, "sequence"))
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(ListAccess::new(self, len, "tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(ListAccess::new(self, len, name))
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        let len = pack::read_count(&mut self.reader)?;
        visitor.visit_map(ListAccess::new(self, len, "map"))
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(ListAccess::new(self, fields.len(), name))
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(VariantAccess {
            deserializer: self,
            name,
        })
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_u32(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Provides access to a sequence of known length.
struct ListAccess<'a, R> {
    deserializer: &'a mut Deserializer<R>,
    len: usize,
    name: &'static str,
}

impl<'a, R> ListAccess<'a, R> {
    fn new(deserializer: &'a mut Deserializer<R>, len: usize, name: &'static str) -> Self {
        Self {
            deserializer,
            len,
            name,
        }
    }
}

/// Provides access to enum variant data.
struct VariantAccess<'a, R> {
    deserializer: &'a mut Deserializer<R>,
    name: &'static str,
}

impl<'de, R: Read<'de>> de::SeqAccess<'de> for ListAccess<'_, R> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.len == 0 {
            Ok(None)
        } else {
            self.len -= 1;
            let v = seed
                .deserialize(&mut *self.deserializer)
                .context(Op::Decode, self.name)?;
            Ok(Some(v))
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

impl<'de, R: Read<'de>> de::MapAccess<'de> for ListAccess<'_, R> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: de::DeserializeSeed<'de>,
    {
        if self.len == 0 {
            Ok(None)
        } else {
            self.len -= 1;
            let v = seed
                .deserialize(&mut *self.deserializer)
                .context(Op::Decode, self.name)?;
            Ok(Some(v))
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.deserializer)
            .context(Op::Decode, self.name)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

impl<'de, R: Read<'de>> de::EnumAccess<'de> for VariantAccess<'_, R> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        let v = seed
            .deserialize(&mut *self.deserializer)
            .context(Op::Decode, self.name)?;
        Ok((v, self))
    }
}

impl<'de, R: Read<'de>> de::VariantAccess<'de> for VariantAccess<'_, R> {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.deserializer)
            .context(Op::Decode, self.name)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(ListAccess::new(self.deserializer, len, self.name))
    }

    fn struct_variant<V>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(ListAccess::new(self.deserializer, fields.len(), self.name))
    }
}
