//! Fast-path and forced-generic parsers, exposed for the fuzz targets.
//!
//! Each pair takes the raw token text. The forced-generic variant skips the
//! fast path entirely, so a fuzz target can check that both agree.

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::{
    error::Result,
    guid::{parse_uuid, parse_uuid_generic},
    number::{
        parse_decimal, parse_decimal_generic, parse_double, parse_double_generic,
        parse_float, parse_float_generic, parse_int, parse_int_generic, parse_long,
        parse_long_generic,
    },
    time::{parse_date_time, parse_date_time_generic},
};

pub fn int(token: &[u8]) -> Result<i32> {
    parse_int(token, 0)
}

pub fn int_generic(token: &[u8]) -> Result<i32> {
    parse_int_generic(token, 0)
}

pub fn long(token: &[u8]) -> Result<i64> {
    parse_long(token, 0)
}

pub fn long_generic(token: &[u8]) -> Result<i64> {
    parse_long_generic(token, 0)
}

pub fn float(token: &[u8]) -> Result<f32> {
    parse_float(token, 0)
}

pub fn float_generic(token: &[u8]) -> Result<f32> {
    parse_float_generic(token, 0)
}

pub fn double(token: &[u8]) -> Result<f64> {
    parse_double(token, 0)
}

pub fn double_generic(token: &[u8]) -> Result<f64> {
    parse_double_generic(token, 0)
}

pub fn decimal(token: &[u8]) -> Result<BigDecimal> {
    parse_decimal(token, 0)
}

pub fn decimal_generic(token: &[u8]) -> Result<BigDecimal> {
    parse_decimal_generic(token, 0)
}

/// Unquoted UUID text.
pub fn uuid(text: &[u8]) -> Result<Uuid> {
    parse_uuid(text, 0)
}

pub fn uuid_generic(text: &[u8]) -> Result<Uuid> {
    parse_uuid_generic(text, 0)
}

/// Unquoted date-time text.
pub fn date_time(text: &[u8]) -> Result<DateTime<FixedOffset>> {
    parse_date_time(text, 0)
}

pub fn date_time_generic(text: &[u8]) -> Result<DateTime<FixedOffset>> {
    parse_date_time_generic(text, 0)
}
