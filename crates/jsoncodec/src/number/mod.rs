//! Numeric codecs: `i32`, `i64`, `f32`, `f64`, [`BigDecimal`] and the dynamic
//! [`NumberValue`].
//!
//! Every reader first copies the token into the reader's scratch buffer (see
//! [`read_token`]), then tries a fast path that only succeeds when its result
//! is exactly what the arbitrary-precision parse would produce. Anything the
//! fast path is unsure about goes to the generic parser for the whole token;
//! partially accumulated fast-path state is never reused.

mod decimal;
mod float;
mod integer;

use core::{fmt, str::FromStr};

use bigdecimal::{BigDecimal, FromPrimitive};
use bstr::BString;
use log::trace;
use num_bigint::BigInt;

pub use decimal::{deserialize_decimal, serialize_decimal, serialize_nullable_decimal};
#[cfg(any(test, feature = "fuzzing"))]
pub(crate) use decimal::{parse_decimal, parse_decimal_generic};
pub use float::{
    deserialize_double, deserialize_float, serialize_double, serialize_float,
    serialize_nullable_double, serialize_nullable_float,
};
#[cfg(any(test, feature = "fuzzing"))]
pub(crate) use float::{parse_double, parse_double_generic, parse_float, parse_float_generic};
pub use integer::{
    deserialize_int, deserialize_long, serialize_int, serialize_long, serialize_nullable_int,
    serialize_nullable_long,
};
#[cfg(any(test, feature = "fuzzing"))]
pub(crate) use integer::{parse_int, parse_int_generic, parse_long, parse_long_generic};

use crate::{
    JsonCodec, JsonReader, JsonWriter,
    digits::POW_10,
    error::{CodecError, ErrorKind, Result},
    reader::ends_number,
};

/// Longest token the fast paths accept; 18 decimal digits always fit in an
/// `i64` accumulator.
pub(crate) const MAX_FAST_LEN: usize = 18;

/// Longest mantissa whose value is exact in binary64.
pub(crate) const MAX_EXACT_DOUBLE_DIGITS: usize = 15;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub(crate) len: usize,
    /// The scratch buffer had to grow to hold the token.
    pub(crate) grown: bool,
}

/// Copies the current number token into the reader's scratch buffer, growing
/// the buffer (by doubling) for as long as the token keeps going.
pub(crate) fn read_token(reader: &mut JsonReader<'_>) -> Result<Token> {
    let mut len = reader.read_number();
    let mut grown = false;
    while len == reader.tmp.len() && reader.peek().is_some_and(|b| !ends_number(b)) {
        reader.grow_scratch();
        grown = true;
        while len < reader.tmp.len() {
            match reader.peek() {
                Some(b) if !ends_number(b) => {
                    reader.tmp[len] = reader.read()?;
                    len += 1;
                }
                _ => break,
            }
        }
    }
    Ok(Token { len, grown })
}

/// A short number token split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scanned {
    pub(crate) negative: bool,
    /// All integer and fraction digits, without the decimal point.
    pub(crate) mantissa: u64,
    pub(crate) digits: usize,
    pub(crate) fraction_digits: usize,
    pub(crate) exponent: Option<i64>,
}

impl Scanned {
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn signed_mantissa(&self) -> i64 {
        let magnitude = self.mantissa as i64;
        if self.negative { -magnitude } else { magnitude }
    }

    /// `mantissa / 10^fraction_digits` when both operands are exact, which
    /// makes the single division correctly rounded.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn exact_double(&self) -> Option<f64> {
        if self.exponent.is_some() || self.digits > MAX_EXACT_DOUBLE_DIGITS {
            return None;
        }
        let magnitude = self.mantissa as f64 / POW_10[self.fraction_digits];
        Some(if self.negative { -magnitude } else { magnitude })
    }

    /// Scale of the equivalent decimal: fraction digits minus the exponent.
    pub(crate) fn scale(&self) -> i64 {
        #[allow(clippy::cast_possible_wrap)]
        let fraction = self.fraction_digits as i64;
        fraction - self.exponent.unwrap_or(0)
    }
}

fn scan_digits(token: &[u8], i: &mut usize, mut f: impl FnMut(u8)) -> usize {
    let start = *i;
    while let Some(&b) = token.get(*i) {
        if !b.is_ascii_digit() {
            break;
        }
        f(b - b'0');
        *i += 1;
    }
    *i - start
}

/// Splits `[+-]?digits[.digits][(e|E)[+-]?digits]` in one forward pass.
/// Returns `None` for anything else, including tokens longer than
/// [`MAX_FAST_LEN`].
pub(crate) fn scan(token: &[u8]) -> Option<Scanned> {
    if token.len() > MAX_FAST_LEN {
        return None;
    }
    let (negative, mut i) = match token.first()? {
        b'-' => (true, 1),
        b'+' => (false, 1),
        _ => (false, 0),
    };

    let mut mantissa = 0u64;
    let mut push = |d: u8| mantissa = (mantissa << 3) + (mantissa << 1) + u64::from(d);
    let int_digits = scan_digits(token, &mut i, &mut push);
    if int_digits == 0 {
        return None;
    }
    let mut fraction_digits = 0;
    if token.get(i) == Some(&b'.') {
        i += 1;
        fraction_digits = scan_digits(token, &mut i, &mut push);
        if fraction_digits == 0 {
            return None;
        }
    }

    let mut exponent = None;
    if matches!(token.get(i), Some(b'e' | b'E')) {
        i += 1;
        let exp_negative = match token.get(i) {
            Some(b'-') => {
                i += 1;
                true
            }
            Some(b'+') => {
                i += 1;
                false
            }
            _ => false,
        };
        let mut exp = 0i64;
        if scan_digits(token, &mut i, |d| exp = (exp << 3) + (exp << 1) + i64::from(d)) == 0 {
            return None;
        }
        exponent = Some(if exp_negative { -exp } else { exp });
    }

    (i == token.len()).then_some(Scanned {
        negative,
        mantissa,
        digits: int_digits + fraction_digits,
        fraction_digits,
        exponent,
    })
}

#[inline]
pub(crate) fn is_number_text(text: &[u8]) -> bool {
    !text.is_empty()
        && text
            .iter()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

/// Parses the whole token as an arbitrary-precision decimal.
pub(crate) fn parse_number_generic(token: &[u8], position: usize) -> Result<BigDecimal> {
    trace!("parsing number token at {position} through the generic path");
    let text = token.trim_ascii_end();
    let invalid = || CodecError::new(ErrorKind::InvalidNumber(BString::from(text)), position);
    if !is_number_text(text) {
        return Err(invalid());
    }
    let text = core::str::from_utf8(text).map_err(|_| invalid())?;
    BigDecimal::from_str(text).map_err(|_| invalid())
}

/// A number whose JSON shape decides its representation.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberValue {
    /// Integer token without fraction or exponent.
    Long(i64),
    /// Token with a fraction and no exponent.
    Double(f64),
    /// Token with an exponent, or one too long for the other variants.
    Decimal(BigDecimal),
}

impl NumberValue {
    #[must_use]
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            Self::Long(v) => Some(BigDecimal::from(*v)),
            Self::Double(v) => BigDecimal::from_f64(*v),
            Self::Decimal(v) => Some(v.clone()),
        }
    }
}

impl From<i64> for NumberValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for NumberValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<BigDecimal> for NumberValue {
    fn from(value: BigDecimal) -> Self {
        Self::Decimal(value)
    }
}

pub(crate) fn parse_number_value(token: &[u8], position: usize) -> Result<NumberValue> {
    let Some(scanned) = scan(token) else {
        return parse_number_generic(token, position).map(NumberValue::Decimal);
    };
    Ok(match scanned.exponent {
        Some(_) => NumberValue::Decimal(BigDecimal::new(
            BigInt::from(scanned.signed_mantissa()),
            scanned.scale(),
        )),
        None if scanned.fraction_digits == 0 => NumberValue::Long(scanned.signed_mantissa()),
        None => match scanned.exact_double() {
            Some(v) => NumberValue::Double(v),
            None => NumberValue::Double(float::parse_double_generic(token, position)?),
        },
    })
}

/// Reads a number and picks its representation from the token's shape.
pub fn deserialize_number(reader: &mut JsonReader<'_>) -> Result<NumberValue> {
    let token = read_token(reader)?;
    let position = reader.token_start();
    let text = &reader.scratch()[..token.len];
    if token.grown {
        return parse_number_generic(text, position).map(NumberValue::Decimal);
    }
    parse_number_value(text, position)
}

pub fn serialize_number(value: &NumberValue, writer: &mut JsonWriter) {
    match value {
        NumberValue::Long(v) => serialize_long(*v, writer),
        NumberValue::Double(v) => serialize_double(*v, writer),
        NumberValue::Decimal(v) => serialize_decimal(v, writer),
    }
}

impl JsonCodec for NumberValue {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_number(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_number(reader)
    }
}

impl fmt::Display for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(v) => fmt::Display::fmt(v, f),
            Self::Double(v) => fmt::Display::fmt(v, f),
            Self::Decimal(v) => fmt::Display::fmt(v, f),
        }
    }
}
