use bigdecimal::{BigDecimal, ToPrimitive};
use num_bigint::Sign;

use super::{parse_number_generic, read_token};
use crate::{
    JsonCodec, JsonReader, JsonWriter,
    digits::DIGITS,
    error::{CodecError, ErrorKind, Result},
};

/// Bytes needed for the digits of an `i32`, written backward from index 10.
const INT_REGION: usize = 11;
/// Bytes needed for the digits of an `i64`, written backward from index 20.
const LONG_REGION: usize = 21;
/// A non-zero integral value scaled by `10^19` or more is outside `i64`.
const MAX_INTEGRAL_EXPONENT: i64 = 18;

/// Writes `magnitude` into `tmp[..end]` two digits at a time, right to left,
/// and flushes the populated suffix.
#[allow(clippy::cast_possible_truncation)]
fn write_magnitude(mut magnitude: u64, end: usize, writer: &mut JsonWriter) {
    let buf = writer.tmp_mut();
    let mut pos = end - 1;
    let mut pair;
    loop {
        let q = magnitude / 100;
        let r = magnitude - ((q << 6) + (q << 5) + (q << 2));
        magnitude = q;
        pair = DIGITS[r as usize];
        buf[pos] = pair as u8;
        buf[pos - 1] = (pair >> 8) as u8;
        if magnitude == 0 {
            break;
        }
        pos -= 2;
    }
    let start = pos - 1 + (pair >> 16) as usize;
    writer.write_buffer_range(start, end);
}

pub fn serialize_int(value: i32, writer: &mut JsonWriter) {
    if value == i32::MIN {
        writer.write_ascii("-2147483648");
        return;
    }
    if value < 0 {
        writer.write_byte(b'-');
    }
    write_magnitude(u64::from(value.unsigned_abs()), INT_REGION, writer);
}

pub fn serialize_long(value: i64, writer: &mut JsonWriter) {
    if value == i64::MIN {
        writer.write_ascii("-9223372036854775808");
        return;
    }
    if value < 0 {
        writer.write_byte(b'-');
    }
    write_magnitude(value.unsigned_abs(), LONG_REGION, writer);
}

pub fn serialize_nullable_int(value: Option<i32>, writer: &mut JsonWriter) {
    match value {
        Some(v) => serialize_int(v, writer),
        None => writer.write_null(),
    }
}

pub fn serialize_nullable_long(value: Option<i64>, writer: &mut JsonWriter) {
    match value {
        Some(v) => serialize_long(v, writer),
        None => writer.write_null(),
    }
}

/// Accumulates a signed integer with the sign folded into each step.
///
/// The first 18 digits cannot overflow; later digits use checked arithmetic.
/// `None` means the token needs the generic parser.
fn accumulate(token: &[u8]) -> Option<i64> {
    let (negative, digits) = match token.first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value = 0i64;
    for (i, &b) in digits.iter().enumerate() {
        let ind = b.wrapping_sub(b'0');
        if ind > 9 {
            return None;
        }
        let ind = i64::from(ind);
        if i < 18 {
            value = (value << 3) + (value << 1);
            value = if negative { value - ind } else { value + ind };
        } else {
            value = value.checked_mul(10)?;
            value = if negative {
                value.checked_sub(ind)?
            } else {
                value.checked_add(ind)?
            };
        }
    }
    Some(value)
}

fn integral(token: &[u8], position: usize) -> Result<BigDecimal> {
    let value = parse_number_generic(token, position)?;
    if value.as_bigint_and_exponent().1 > 0 {
        return Err(CodecError::new(
            ErrorKind::DecimalWhereIntegerExpected(value),
            position,
        ));
    }
    Ok(value)
}

fn out_of_range(value: BigDecimal, target: &'static str, position: usize) -> CodecError {
    CodecError::new(ErrorKind::NumberOutOfRange { value, target }, position)
}

/// Rejects values whose exponent alone puts them out of range, before the
/// conversion rescales them to an exponent of zero. Zero with any exponent
/// becomes plain zero.
fn bounded(value: BigDecimal, target: &'static str, position: usize) -> Result<BigDecimal> {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    if unscaled.sign() == Sign::NoSign {
        return Ok(BigDecimal::from(0));
    }
    if -scale > MAX_INTEGRAL_EXPONENT {
        return Err(out_of_range(value, target, position));
    }
    Ok(value)
}

pub(crate) fn parse_long_generic(token: &[u8], position: usize) -> Result<i64> {
    let value = bounded(integral(token, position)?, "i64", position)?;
    value
        .to_i64()
        .ok_or_else(|| out_of_range(value, "i64", position))
}

pub(crate) fn parse_int_generic(token: &[u8], position: usize) -> Result<i32> {
    let value = bounded(integral(token, position)?, "i32", position)?;
    value
        .to_i32()
        .ok_or_else(|| out_of_range(value, "i32", position))
}

pub(crate) fn parse_long(token: &[u8], position: usize) -> Result<i64> {
    match accumulate(token) {
        Some(v) => Ok(v),
        None => parse_long_generic(token, position),
    }
}

pub(crate) fn parse_int(token: &[u8], position: usize) -> Result<i32> {
    match accumulate(token).and_then(|v| i32::try_from(v).ok()) {
        Some(v) => Ok(v),
        None => parse_int_generic(token, position),
    }
}

pub fn deserialize_int(reader: &mut JsonReader<'_>) -> Result<i32> {
    let token = read_token(reader)?;
    parse_int(&reader.scratch()[..token.len], reader.token_start())
}

pub fn deserialize_long(reader: &mut JsonReader<'_>) -> Result<i64> {
    let token = read_token(reader)?;
    parse_long(&reader.scratch()[..token.len], reader.token_start())
}

impl JsonCodec for i32 {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_int(*self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_int(reader)
    }
}

impl JsonCodec for i64 {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_long(*self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_long(reader)
    }
}
