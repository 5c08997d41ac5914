use alloc::string::ToString;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

use super::{parse_number_generic, read_token, scan};
use crate::{JsonCodec, JsonReader, JsonWriter, error::Result};

/// Writes the decimal keeping its scale: `1.50` stays `1.50`.
///
/// Plain notation is used when the scale is not negative and the value has
/// at most six leading zeros after the point; otherwise the text is
/// `d.dddE±n`, which reads back with the same unscaled value and scale.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn serialize_decimal(value: &BigDecimal, writer: &mut JsonWriter) {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    if unscaled.sign() == Sign::Minus {
        writer.write_byte(b'-');
    }
    let digits = unscaled.magnitude().to_string();
    let len = digits.len() as i64;
    let adjusted = len - 1 - scale;
    if scale >= 0 && adjusted >= -6 {
        if scale == 0 {
            writer.write_ascii(&digits);
        } else if len > scale {
            let point = (len - scale) as usize;
            writer.write_ascii(&digits[..point]);
            writer.write_byte(b'.');
            writer.write_ascii(&digits[point..]);
        } else {
            writer.write_ascii("0.");
            for _ in len..scale {
                writer.write_byte(b'0');
            }
            writer.write_ascii(&digits);
        }
        return;
    }
    writer.write_ascii(&digits[..1]);
    if len > 1 {
        writer.write_byte(b'.');
        writer.write_ascii(&digits[1..]);
    }
    writer.write_byte(b'E');
    if adjusted >= 0 {
        writer.write_byte(b'+');
    }
    writer.write_display(adjusted);
}

pub fn serialize_nullable_decimal(value: Option<&BigDecimal>, writer: &mut JsonWriter) {
    match value {
        Some(v) => serialize_decimal(v, writer),
        None => writer.write_null(),
    }
}

pub(crate) fn parse_decimal_generic(token: &[u8], position: usize) -> Result<BigDecimal> {
    parse_number_generic(token, position)
}

/// Builds the decimal straight from the scanned mantissa and scale.
pub(crate) fn parse_decimal(token: &[u8], position: usize) -> Result<BigDecimal> {
    match scan(token) {
        Some(s) => Ok(BigDecimal::new(BigInt::from(s.signed_mantissa()), s.scale())),
        None => parse_decimal_generic(token, position),
    }
}

pub fn deserialize_decimal(reader: &mut JsonReader<'_>) -> Result<BigDecimal> {
    let token = read_token(reader)?;
    let text = &reader.scratch()[..token.len];
    if token.grown {
        return parse_decimal_generic(text, reader.token_start());
    }
    parse_decimal(text, reader.token_start())
}

impl JsonCodec for BigDecimal {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_decimal(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_decimal(reader)
    }
}
