use std::io;

use super::{Decode, Encode};
use crate::error::{Error, Result};
use crate::pack;
use crate::read::Read;

pub(crate) const TRUE: u8 = b'1';
pub(crate) const FALSE: u8 = b'0';

pub(crate) fn write_bool<W: io::Write>(mut writer: W, v: bool) -> Result<()> {
    Ok(writer.write_all(&[if v { TRUE } else { FALSE }])?)
}

pub(crate) fn read_bool<'de, R: Read<'de>>(mut reader: R) -> Result<bool> {
    match reader.read_bytes()? {
        [TRUE] => Ok(true),
        [FALSE] => Ok(false),
        [b] => Err(Error::InvalidBool(b)),
    }
}

pub(crate) fn read_char<'de, R: Read<'de>>(reader: R) -> Result<char> {
    let code: u32 = pack::read(reader)?;
    char::from_u32(code).ok_or(Error::InvalidChar(code))
}

impl Encode for bool {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        write_bool(writer, *self)
    }
}

impl Decode for bool {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        read_bool(reader)
    }
}

impl Encode for u8 {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        Ok(writer.write_all(&[*self])?)
    }

    fn encode_slice<W: io::Write>(items: &[Self], writer: &mut W) -> Result<()> {
        Ok(writer.write_all(items)?)
    }
}

impl Decode for u8 {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        let [b] = reader.read_bytes()?;
        Ok(b)
    }

    fn decode_vec<'de, R: Read<'de>>(reader: &mut R, len: usize) -> Result<Vec<Self>> {
        reader.read_byte_vec(len)
    }
}

impl Encode for i8 {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        Ok(writer.write_all(&self.to_le_bytes())?)
    }
}

impl Decode for i8 {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        reader.read_bytes().map(Self::from_le_bytes)
    }
}

impl Encode for char {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        pack::write(writer, u32::from(*self))
    }
}

impl Decode for char {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        read_char(reader)
    }
}

impl Encode for () {
    fn encode<W: io::Write>(&self, _writer: &mut W) -> Result<()> {
        Ok(())
    }
}

impl Decode for () {
    fn decode<'de, R: Read<'de>>(_reader: &mut R) -> Result<Self> {
        Ok(())
    }
}

macro_rules! impl_packed {
    ($($Ty:ty)*) => { $(
        impl Encode for $Ty {
            fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
                pack::write(writer, *self)
            }
        }

        impl Decode for $Ty {
            fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
                pack::read(reader)
            }
        }
    )* };
}

impl_packed!(u16 u32 u64 usize i16 i32 i64 isize);

#[cfg(test)]
mod tests {
    use crate::{Error, from_slice, to_vec};

    #[test]
    fn bool_is_ascii_digit() {
        assert_eq!(to_vec(&true).expect("true"), b"1", "true");
        assert_eq!(to_vec(&false).expect("false"), b"0", "false");
        assert!(from_slice::<bool>(b"1").expect("true"), "true");
        assert!(!from_slice::<bool>(b"0").expect("false"), "false");
    }

    #[test]
    fn bool_is_strict() {
        for b in [b'2', 0, 1, b'T'] {
            let err = from_slice::<bool>(&[b]).expect_err("invalid bool");
            assert!(
                matches!(err, Error::InvalidBool(x) if x == b),
                "must reject {b:#x}: {err:?}"
            );
        }

        assert!(
            from_slice::<bool>(&[]).expect_err("empty").is_eof(),
            "must be eof"
        );
    }

    #[test]
    fn single_bytes_are_raw() {
        assert_eq!(to_vec(&0xABu8).expect("u8"), [0xAB], "u8");
        assert_eq!(to_vec(&-1i8).expect("i8"), [0xFF], "i8");
        assert_eq!(from_slice::<i8>(&[0x80]).expect("i8"), i8::MIN, "i8");
    }

    #[test]
    fn char_is_packed_code_point() {
        assert_eq!(to_vec(&'A').expect("A"), [0x01, 0x41], "ascii");
        assert_eq!(to_vec(&'€').expect("€"), [0x02, 0xAC, 0x20], "bmp");
        assert_eq!(from_slice::<char>(&[0x02, 0xAC, 0x20]).expect("€"), '€', "bmp");

        let err = from_slice::<char>(&[0x02, 0x00, 0xD8]).expect_err("surrogate");
        assert!(
            matches!(err, Error::InvalidChar(0xD800)),
            "must reject surrogates: {err:?}"
        );
    }

    #[test]
    fn ints_are_packed() {
        assert_eq!(to_vec(&300u32).expect("300"), [0x02, 0x2C, 0x01], "300");
        assert_eq!(from_slice::<u16>(&[0x02, 0x2C, 0x01]).expect("u16"), 300, "u16");
        assert!(
            matches!(
                from_slice::<i16>(&[0x83, 0x01, 0x00, 0x01]),
                Err(Error::IntegerOverflow { ty: "i16", size: 3 })
            ),
            "i16 must overflow"
        );
    }
}
