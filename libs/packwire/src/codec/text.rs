use std::io;
use std::ops::{Deref, DerefMut};

use super::{Decode, Encode, decoding, encoding};
use crate::error::{Error, Result};
use crate::pack;
use crate::read::Read;

impl Encode for str {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("String", || {
            pack::write_count(&mut *writer, self.len())?;
            Ok(writer.write_all(self.as_bytes())?)
        })
    }
}

impl Encode for String {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.as_str().encode(writer)
    }
}

impl Decode for String {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("String", || {
            let len = pack::read_count(&mut *reader)?;
            let buf = reader.read_byte_vec(len)?;
            Self::from_utf8(buf).map_err(|_| Error::InvalidUtf8)
        })
    }
}

/// A string encoded character by character.
///
/// The count prefix is the number of [`char`]s rather than bytes, and each
/// character is written as a packed integer. This is larger than the
/// [`String`] encoding for most text but matches the wire form of
/// `Vec<char>` and of wide-character strings produced elsewhere.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WideString(pub String);

impl Deref for WideString {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for WideString {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<String> for WideString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WideString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Encode for WideString {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("WideString", || {
            pack::write_count(&mut *writer, self.0.chars().count())?;
            self.0.chars().try_for_each(|c| c.encode(writer))
        })
    }
}

impl Decode for WideString {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("WideString", || {
            let len = pack::read_count(&mut *reader)?;
            let mut out = String::with_capacity(len.min(super::PREALLOC_LIMIT));
            for _ in 0..len {
                out.push(char::decode(reader)?);
            }
            Ok(Self(out))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_slice, to_vec};

    #[test]
    fn string_is_counted_bytes() {
        assert_eq!(to_vec("abcd").expect("str"), b"\x01\x04abcd", "ascii");
        assert_eq!(to_vec("").expect("empty"), b"\x00", "empty");

        let s = "ヴァンプ".to_owned();
        let buf = to_vec(&s).expect("string");
        assert_eq!(buf[..2], [0x01, 12], "count is byte length");
        assert_eq!(from_slice::<String>(&buf).expect("string"), s, "round-trip");
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        let err = from_slice::<String>(b"\x01\x02\xC3\x28").expect_err("invalid");
        assert!(
            matches!(err.root(), Error::InvalidUtf8),
            "must be utf-8 error: {err:?}"
        );
        assert_eq!(err.trail().collect::<Vec<_>>(), ["String"], "trail");
    }

    #[test]
    fn string_short_read() {
        let err = from_slice::<String>(b"\x01\x05abcd").expect_err("too short");
        assert!(err.is_eof(), "must be eof: {err:?}");
    }

    #[test]
    fn wide_string_is_counted_chars() {
        let s = WideString::from("a€");
        let buf = to_vec(&s).expect("wide");
        assert_eq!(buf, [0x01, 0x02, 0x01, 0x61, 0x02, 0xAC, 0x20], "per char");
        assert_eq!(to_vec(&vec!['a', '€']).expect("chars"), buf, "same as Vec<char>");
        assert_eq!(from_slice::<WideString>(&buf).expect("wide"), s, "round-trip");
    }
}
