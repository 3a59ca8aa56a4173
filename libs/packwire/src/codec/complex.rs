use std::io;

use num_complex::Complex;

use super::{Decode, Encode, decoding, encoding};
use crate::error::Result;
use crate::read::Read;

impl<T: Encode> Encode for Complex<T> {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        encoding("Complex", || {
            self.re.encode(writer)?;
            self.im.encode(writer)
        })
    }
}

impl<T: Decode> Decode for Complex<T> {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        decoding("Complex", || {
            let re = T::decode(reader)?;
            let im = T::decode(reader)?;
            Ok(Self::new(re, im))
        })
    }
}
