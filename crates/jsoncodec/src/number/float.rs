use core::str::FromStr;

use bstr::BString;
use log::trace;

use super::{MAX_FAST_LEN, is_number_text, read_token, scan};
use crate::{
    JsonCodec, JsonReader, JsonWriter,
    digits::POW_10,
    error::{CodecError, ErrorKind, Result},
};

/// Longest mantissa whose value is exact in binary32.
const MAX_EXACT_FLOAT_DIGITS: usize = 7;

/// Writes `"NaN"`, `"Infinity"` or `"-Infinity"` for non-finite values.
/// Returns `false` for finite values, which the caller writes itself.
fn write_non_finite(nan: bool, infinite: bool, negative: bool, writer: &mut JsonWriter) -> bool {
    if nan {
        writer.write_ascii("\"NaN\"");
    } else if infinite {
        writer.write_ascii(if negative { "\"-Infinity\"" } else { "\"Infinity\"" });
    } else {
        return false;
    }
    true
}

/// Shortest representation that parses back to the same bits. Very large and
/// very small magnitudes use exponent notation.
fn write_finite<F>(value: F, abs: f64, writer: &mut JsonWriter)
where
    F: core::fmt::Display + core::fmt::LowerExp,
{
    if abs != 0.0 && !(1e-7..1e21).contains(&abs) {
        writer.write_display(format_args!("{value:e}"));
    } else {
        writer.write_display(value);
    }
}

pub fn serialize_double(value: f64, writer: &mut JsonWriter) {
    if !write_non_finite(
        value.is_nan(),
        value.is_infinite(),
        value.is_sign_negative(),
        writer,
    ) {
        write_finite(value, value.abs(), writer);
    }
}

pub fn serialize_float(value: f32, writer: &mut JsonWriter) {
    if !write_non_finite(
        value.is_nan(),
        value.is_infinite(),
        value.is_sign_negative(),
        writer,
    ) {
        write_finite(value, f64::from(value.abs()), writer);
    }
}

pub fn serialize_nullable_double(value: Option<f64>, writer: &mut JsonWriter) {
    match value {
        Some(v) => serialize_double(v, writer),
        None => writer.write_null(),
    }
}

pub fn serialize_nullable_float(value: Option<f32>, writer: &mut JsonWriter) {
    match value {
        Some(v) => serialize_float(v, writer),
        None => writer.write_null(),
    }
}

/// Non-finite values spelled the way [`write_non_finite`] writes them.
trait NonFinite: FromStr {
    const NAN: Self;
    const INFINITY: Self;
    const NEG_INFINITY: Self;
}

impl NonFinite for f64 {
    const NAN: Self = f64::NAN;
    const INFINITY: Self = f64::INFINITY;
    const NEG_INFINITY: Self = f64::NEG_INFINITY;
}

impl NonFinite for f32 {
    const NAN: Self = f32::NAN;
    const INFINITY: Self = f32::INFINITY;
    const NEG_INFINITY: Self = f32::NEG_INFINITY;
}

fn invalid_float(text: &[u8], position: usize) -> CodecError {
    CodecError::new(ErrorKind::InvalidFloat(BString::from(text)), position)
}

/// Parses number text with the platform float parser. Only the number
/// alphabet is accepted, so spellings such as `inf` or `nan` are rejected.
fn parse_generic<F: FromStr>(token: &[u8], position: usize) -> Result<F> {
    trace!("parsing float token at {position} through the generic path");
    let text = token.trim_ascii_end();
    if !is_number_text(text) {
        return Err(invalid_float(token, position));
    }
    core::str::from_utf8(text)
        .ok()
        .and_then(|s| F::from_str(s).ok())
        .ok_or_else(|| invalid_float(text, position))
}

/// Interior of a quoted float: exactly `NaN`, `Infinity`, `-Infinity`, or
/// number text.
fn parse_quoted<F: NonFinite>(text: &[u8], position: usize) -> Result<F> {
    match text {
        b"NaN" => Ok(F::NAN),
        b"Infinity" => Ok(F::INFINITY),
        b"-Infinity" => Ok(F::NEG_INFINITY),
        _ => parse_generic(text, position),
    }
}

pub(crate) fn parse_double_generic(token: &[u8], position: usize) -> Result<f64> {
    parse_generic(token, position)
}

pub(crate) fn parse_float_generic(token: &[u8], position: usize) -> Result<f32> {
    parse_generic(token, position)
}

/// Fast path for plain `[-+]int[.frac]` tokens whose digits are exact in
/// binary64. Exponents and longer tokens go to the generic parser.
pub(crate) fn parse_double(token: &[u8], position: usize) -> Result<f64> {
    if token.len() > MAX_FAST_LEN {
        return parse_double_generic(token, position);
    }
    match scan(token).and_then(|s| s.exact_double()) {
        Some(v) => Ok(v),
        None => parse_double_generic(token, position),
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn parse_float(token: &[u8], position: usize) -> Result<f32> {
    let exact = scan(token).filter(|s| s.exponent.is_none() && s.digits <= MAX_EXACT_FLOAT_DIGITS);
    match exact {
        Some(s) => {
            #[allow(clippy::cast_possible_truncation)]
            let magnitude = s.mantissa as f32 / POW_10[s.fraction_digits] as f32;
            Ok(if s.negative { -magnitude } else { magnitude })
        }
        None => parse_float_generic(token, position),
    }
}

fn deserialize_with<F: NonFinite>(
    reader: &mut JsonReader<'_>,
    fast: fn(&[u8], usize) -> Result<F>,
) -> Result<F> {
    if reader.last() == b'"' {
        let len = reader.read_simple_quote()?;
        return parse_quoted(&reader.scratch()[..len], reader.token_start());
    }
    let token = read_token(reader)?;
    let text = &reader.scratch()[..token.len];
    if token.grown {
        return parse_generic(text, reader.token_start());
    }
    fast(text, reader.token_start())
}

pub fn deserialize_double(reader: &mut JsonReader<'_>) -> Result<f64> {
    deserialize_with(reader, parse_double)
}

pub fn deserialize_float(reader: &mut JsonReader<'_>) -> Result<f32> {
    deserialize_with(reader, parse_float)
}

impl JsonCodec for f64 {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_double(*self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_double(reader)
    }
}

impl JsonCodec for f32 {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_float(*self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_float(reader)
    }
}
