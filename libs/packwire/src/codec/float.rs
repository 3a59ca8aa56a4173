//! Floating point values as decimal text.
//!
//! Unlike everything else in this crate, floats are not binary. A value is
//! written as decimal text followed by a single space, or as one of the
//! tokens `inf `, `ninf ` and `NaN ` for the special values.
//!
//! Formatting is controlled by a [`FloatFormat`] passed to [`write_float`]
//! and [`read_float`]. The [`Encode`] and [`Decode`] impls of [`f32`] and
//! [`f64`] use [`FloatFormat::DEFAULT`].

use std::io;
use std::str::FromStr;

use super::{Decode, Encode};
use crate::error::{Error, Result};
use crate::read::{Read, eof};

const INF: &[u8] = b"inf ";
const NEG_INF: &[u8] = b"ninf ";
const NAN: &[u8] = b"NaN ";

/// Options for writing and reading floating point text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatFormat {
    /// Number of significant digits written. Values below 1 are treated as 1.
    pub precision: usize,
    /// Maximum length of numeric text accepted when reading, excluding the
    /// terminating space.
    pub max_text_len: usize,
}

impl FloatFormat {
    /// 35 significant digits, accepting up to 64 characters of text.
    pub const DEFAULT: Self = Self {
        precision: 35,
        max_text_len: 64,
    };

    /// Returns a copy with a different precision.
    #[must_use]
    pub const fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Returns a copy with a different maximum text length.
    #[must_use]
    pub const fn with_max_text_len(mut self, max_text_len: usize) -> Self {
        self.max_text_len = max_text_len;
        self
    }
}

impl Default for FloatFormat {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A floating point type supported by [`write_float`] and [`read_float`].
pub trait FloatText: Copy + Into<f64> + FromStr {
    const INFINITY: Self;
    const NEG_INFINITY: Self;
    const NAN: Self;
}

impl FloatText for f32 {
    const INFINITY: Self = Self::INFINITY;
    const NEG_INFINITY: Self = Self::NEG_INFINITY;
    const NAN: Self = Self::NAN;
}

impl FloatText for f64 {
    const INFINITY: Self = Self::INFINITY;
    const NEG_INFINITY: Self = Self::NEG_INFINITY;
    const NAN: Self = Self::NAN;
}

/// Writes `v` as text followed by a space.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_float<F, W>(mut writer: W, v: F, format: FloatFormat) -> Result<()>
where
    F: FloatText,
    W: io::Write,
{
    let v: f64 = v.into();
    if v.is_nan() {
        writer.write_all(NAN)?;
    } else if v == f64::INFINITY {
        writer.write_all(INF)?;
    } else if v == f64::NEG_INFINITY {
        writer.write_all(NEG_INF)?;
    } else {
        write!(writer, "{} ", format_general(v, format.precision))?;
    }

    Ok(())
}

/// Reads a value written by [`write_float`], including the terminating space.
///
/// # Errors
///
/// Returns [`Error::InvalidFloat`] if the text is malformed, longer than
/// [`FloatFormat::max_text_len`], or a special token doesn't match exactly.
pub fn read_float<'de, F, R>(mut reader: R, format: FloatFormat) -> Result<F>
where
    F: FloatText,
    R: Read<'de>,
{
    match reader.peek_byte()?.ok_or_else(eof)? {
        b'i' => expect_token(reader, INF).map(|()| F::INFINITY),
        b'n' => expect_token(reader, NEG_INF).map(|()| F::NEG_INFINITY),
        b'N' => expect_token(reader, NAN).map(|()| F::NAN),
        _ => {
            let mut text = Vec::with_capacity(format.max_text_len.min(40));
            loop {
                let [b] = reader.read_bytes()?;
                if b == b' ' {
                    break;
                }

                if text.len() >= format.max_text_len {
                    log::debug!("floating point text exceeds {} bytes", format.max_text_len);
                    return Err(Error::InvalidFloat);
                }

                text.push(b);
            }

            let text = std::str::from_utf8(&text).map_err(|_| Error::InvalidFloat)?;
            text.parse().map_err(|_| {
                log::debug!("rejected floating point text {text:?}");
                Error::InvalidFloat
            })
        },
    }
}

fn expect_token<'de, R: Read<'de>>(mut reader: R, token: &[u8]) -> Result<()> {
    reader.read_byte_view(token.len(), |b| {
        if b == token {
            Ok(())
        } else {
            Err(Error::InvalidFloat)
        }
    })
}

/// Formats `v` with `precision` significant digits in the shorter of fixed
/// and scientific notation, without trailing zeros.
fn format_general(v: f64, precision: usize) -> String {
    let precision = precision.max(1);
    let sci = format!("{v:.*e}", precision - 1);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    let p = i32::try_from(precision).unwrap_or(i32::MAX);
    if exp < -4 || exp >= p {
        let sign = if exp < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exp.unsigned_abs()
        )
    } else {
        // `exp` is in `-4..p` here, so this can't be negative
        let decimals = usize::try_from(p - 1 - exp).unwrap_or(0);
        let fixed = format!("{v:.decimals$}");
        trim_fraction(&fixed).to_owned()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

impl Encode for f32 {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        write_float(writer, *self, FloatFormat::DEFAULT)
    }
}

impl Decode for f32 {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        read_float(reader, FloatFormat::DEFAULT)
    }
}

impl Encode for f64 {
    fn encode<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        write_float(writer, *self, FloatFormat::DEFAULT)
    }
}

impl Decode for f64 {
    fn decode<'de, R: Read<'de>>(reader: &mut R) -> Result<Self> {
        read_float(reader, FloatFormat::DEFAULT)
    }
}
