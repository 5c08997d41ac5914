//! Date and time codecs over chrono types.
//!
//! Writers compose the fixed-width ISO-8601 text in the writer's scratch
//! region with the digit-pair tables. Readers take a fast path for the
//! common fixed-width shapes and hand everything else to chrono's parsers.
//! Instants are written with the offset the value's zone has at that
//! instant; the instant fast path only accepts the `Z` form.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use core::str::FromStr;

use bstr::BString;
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat,
    TimeZone, Timelike, Utc,
};
use log::trace;

use crate::{
    JsonCodec, JsonReader, JsonWriter,
    digits::{all_digits, read2, read4, write2, write3, write4},
    error::{CodecError, ErrorKind, Result},
};

/// Date-times with an explicit offset that the fast path does not cover.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Date-times without an offset; read as UTC.
const LOCAL_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M",
];

#[inline]
fn has_four_digit_year(year: i32) -> bool {
    (0..=9999).contains(&year)
}

/// Writes `"YYYY-MM-DD` into `buf[..11]`.
fn write_date(buf: &mut [u8], date: &impl Datelike) {
    buf[0] = b'"';
    write4(date.year() as u32, &mut buf[1..]);
    buf[5] = b'-';
    write2(date.month(), &mut buf[6..]);
    buf[8] = b'-';
    write2(date.day(), &mut buf[9..]);
}

/// Writes `HH:MM:SS` into `buf[..8]`.
fn write_clock(buf: &mut [u8], time: &impl Timelike) {
    write2(time.hour(), buf);
    buf[2] = b':';
    write2(time.minute(), &mut buf[3..]);
    buf[5] = b':';
    write2(time.second(), &mut buf[6..]);
}

/// Writes `.` and 3, 6 or 9 fraction digits, then drops up to two trailing
/// zeros. Returns the number of bytes written.
fn write_nanos(buf: &mut [u8], nanos: u32) -> usize {
    let nanos = nanos.min(999_999_999);
    buf[0] = b'.';
    let micros = nanos / 1000;
    let millis = micros / 1000;
    let rem_nanos = nanos - micros * 1000;
    let rem_micros = micros - millis * 1000;
    write3(millis, &mut buf[1..]);
    let mut end = if rem_nanos != 0 {
        write3(rem_micros, &mut buf[4..]);
        write3(rem_nanos, &mut buf[7..]);
        10
    } else if rem_micros != 0 {
        write3(rem_micros, &mut buf[4..]);
        7
    } else {
        4
    };
    for _ in 0..2 {
        if buf[end - 1] == b'0' {
            end -= 1;
        }
    }
    end
}

/// Reads 1 to 9 fraction digits as nanoseconds. The caller has checked the
/// digits.
fn read_nanos(fraction: &[u8]) -> u32 {
    let mut value = fraction
        .iter()
        .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'));
    for _ in fraction.len()..9 {
        value *= 10;
    }
    value
}

/// Writes `Z"` for a zero offset, otherwise `±HH:MM"`, or `±HH:MM:SS"` when
/// the offset has a seconds part. Returns the new end.
fn write_offset(buf: &mut [u8], pos: usize, offset_seconds: i32) -> usize {
    if offset_seconds == 0 {
        buf[pos] = b'Z';
        buf[pos + 1] = b'"';
        return pos + 2;
    }
    buf[pos] = if offset_seconds < 0 { b'-' } else { b'+' };
    let seconds = offset_seconds.unsigned_abs();
    write2(seconds / 3600, &mut buf[pos + 1..]);
    buf[pos + 3] = b':';
    write2(seconds % 3600 / 60, &mut buf[pos + 4..]);
    let mut end = pos + 6;
    if seconds % 60 != 0 {
        buf[end] = b':';
        write2(seconds % 60, &mut buf[end + 1..]);
        end += 3;
    }
    buf[end] = b'"';
    end + 1
}

/// Splits a trailing `±HH:MM:SS` offset, which chrono's parsers do not
/// accept, from the local part.
fn split_offset_with_seconds(s: &str) -> Option<(&str, FixedOffset)> {
    let at = s.len().checked_sub(9)?;
    let (local, offset) = (s.get(..at)?, s.get(at..)?.as_bytes());
    let sign = match offset[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    if offset[3] != b':'
        || offset[6] != b':'
        || !all_digits(&offset[1..3])
        || !all_digits(&offset[4..6])
        || !all_digits(&offset[7..9])
    {
        return None;
    }
    let seconds = read2(&offset[1..]) * 3600 + read2(&offset[4..]) * 60 + read2(&offset[7..]);
    Some((local, FixedOffset::east_opt(sign * seconds as i32)?))
}

fn write_quoted_display(writer: &mut JsonWriter, value: impl core::fmt::Display) {
    writer.write_byte(b'"');
    writer.write_display(value);
    writer.write_byte(b'"');
}

/// Writes an instant as `"YYYY-MM-DDTHH:MM:SS[.fff](Z|±HH:MM)"`.
///
/// Milliseconds are omitted when zero and otherwise trimmed of trailing
/// zeros (`.5`, `.54`, `.543`). The offset is the one `Tz` reports for this
/// instant, so zones with daylight saving time write their summer offset in
/// summer.
pub fn serialize_date_time<Tz: TimeZone>(value: &DateTime<Tz>, writer: &mut JsonWriter) {
    let offset = value.offset().fix();
    let local = value.naive_local();
    if !has_four_digit_year(local.year()) {
        let fixed = value.with_timezone(&offset);
        write_quoted_display(writer, fixed.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        return;
    }
    let buf = writer.tmp_mut();
    write_date(buf, &local);
    buf[11] = b'T';
    write_clock(&mut buf[12..], &local);
    let millis = (local.nanosecond() / 1_000_000).min(999);
    let mut pos = 20;
    if millis != 0 {
        buf[20] = b'.';
        let hi = millis / 100;
        let lo = millis - hi * 100;
        buf[21] = hi as u8 + b'0';
        pos = 22;
        if lo != 0 {
            write2(lo, &mut buf[22..]);
            pos = if lo % 10 == 0 { 23 } else { 24 };
        }
    }
    let end = write_offset(buf, pos, offset.local_minus_utc());
    writer.write_buffer(end);
}

fn utc_fast(t: &[u8]) -> Option<DateTime<FixedOffset>> {
    let len = t.len();
    if !matches!(len, 20 | 22..=24)
        || t[len - 1] != b'Z'
        || t[4] != b'-'
        || t[7] != b'-'
        || !matches!(t[10], b'T' | b't' | b' ')
        || t[13] != b':'
        || t[16] != b':'
    {
        return None;
    }
    let nanos = if len == 20 {
        0
    } else {
        let fraction = &t[20..len - 1];
        if t[19] != b'.' || !all_digits(fraction) {
            return None;
        }
        read_nanos(fraction)
    };
    let date = fast_date(&t[..10])?;
    let time = fast_clock(&t[11..19])?.with_nanosecond(nanos)?;
    Some(date.and_time(time).and_utc().fixed_offset())
}

/// `YYYY-MM-DD` with digits checked; `None` for a different shape or an
/// impossible date.
fn fast_date(t: &[u8]) -> Option<NaiveDate> {
    if t.len() != 10
        || t[4] != b'-'
        || t[7] != b'-'
        || !all_digits(&t[..4])
        || !all_digits(&t[5..7])
        || !all_digits(&t[8..10])
    {
        return None;
    }
    NaiveDate::from_ymd_opt(read4(t) as i32, read2(&t[5..]), read2(&t[8..]))
}

/// `HH:MM:SS` with digits checked.
fn fast_clock(t: &[u8]) -> Option<NaiveTime> {
    if t.len() != 8
        || t[2] != b':'
        || t[5] != b':'
        || !all_digits(&t[..2])
        || !all_digits(&t[3..5])
        || !all_digits(&t[6..8])
    {
        return None;
    }
    NaiveTime::from_hms_opt(read2(t), read2(&t[3..]), read2(&t[6..]))
}

/// `HH:MM:SS[.f{1,9}]`.
fn fast_time(t: &[u8]) -> Option<NaiveTime> {
    let clock = fast_clock(t.get(..8)?)?;
    match t.len() {
        8 => Some(clock),
        10..=18 if t[8] == b'.' && all_digits(&t[9..]) => {
            clock.with_nanosecond(read_nanos(&t[9..]))
        }
        _ => None,
    }
}

fn invalid(kind: fn(BString) -> ErrorKind, text: &[u8], position: usize) -> CodecError {
    CodecError::new(kind(BString::from(text)), position)
}

pub(crate) fn parse_date_time_generic(text: &[u8], position: usize) -> Result<DateTime<FixedOffset>> {
    trace!("parsing date-time at {position} through the generic path");
    let s = core::str::from_utf8(text)
        .map_err(|_| invalid(ErrorKind::InvalidDateTime, text, position))?;
    if let Ok(v) = DateTime::parse_from_rfc3339(s) {
        return Ok(v);
    }
    if let Some(v) = OFFSET_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(s, f).ok())
    {
        return Ok(v);
    }
    if let Some(v) = LOCAL_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Ok(v.and_utc().fixed_offset());
    }
    if let Some(v) = split_offset_with_seconds(s).and_then(|(local, offset)| {
        let local = NaiveDateTime::parse_from_str(local, LOCAL_FORMATS[1]).ok()?;
        offset.from_local_datetime(&local).single()
    }) {
        return Ok(v);
    }
    NaiveDate::from_str(s)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|v| v.and_utc().fixed_offset())
        .ok_or_else(|| invalid(ErrorKind::InvalidDateTime, text, position))
}

pub(crate) fn parse_date_time(text: &[u8], position: usize) -> Result<DateTime<FixedOffset>> {
    match utc_fast(text) {
        Some(v) => Ok(v),
        None => parse_date_time_generic(text, position),
    }
}

pub fn deserialize_date_time(reader: &mut JsonReader<'_>) -> Result<DateTime<FixedOffset>> {
    let len = reader.read_simple_quote()?;
    parse_date_time(&reader.scratch()[..len], reader.token_start())
}

impl JsonCodec for DateTime<FixedOffset> {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_date_time(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_date_time(reader)
    }
}

impl JsonCodec for DateTime<Utc> {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_date_time(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_date_time(reader).map(|v| v.with_timezone(&Utc))
    }
}

pub fn serialize_date(value: &NaiveDate, writer: &mut JsonWriter) {
    if !has_four_digit_year(value.year()) {
        write_quoted_display(writer, value);
        return;
    }
    let buf = writer.tmp_mut();
    write_date(buf, value);
    buf[11] = b'"';
    writer.write_buffer(12);
}

pub(crate) fn parse_date(text: &[u8], position: usize) -> Result<NaiveDate> {
    if let Some(v) = fast_date(text) {
        return Ok(v);
    }
    trace!("parsing date at {position} through the generic path");
    core::str::from_utf8(text)
        .ok()
        .and_then(|s| NaiveDate::from_str(s).ok())
        .ok_or_else(|| invalid(ErrorKind::InvalidDate, text, position))
}

pub fn deserialize_date(reader: &mut JsonReader<'_>) -> Result<NaiveDate> {
    let len = reader.read_simple_quote()?;
    parse_date(&reader.scratch()[..len], reader.token_start())
}

impl JsonCodec for NaiveDate {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_date(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_date(reader)
    }
}

/// Writes `"YYYY-MM-DDTHH:MM:SS[.f…]"` with the fraction trimmed.
pub fn serialize_local_date_time(value: &NaiveDateTime, writer: &mut JsonWriter) {
    if !has_four_digit_year(value.year()) {
        write_quoted_display(writer, value.format("%Y-%m-%dT%H:%M:%S%.f"));
        return;
    }
    let buf = writer.tmp_mut();
    write_date(buf, value);
    buf[11] = b'T';
    write_clock(&mut buf[12..], value);
    let mut end = 20;
    if value.nanosecond() != 0 {
        end += write_nanos(&mut buf[20..], value.nanosecond());
    }
    buf[end] = b'"';
    writer.write_buffer(end + 1);
}

fn local_date_time_fast(t: &[u8]) -> Option<NaiveDateTime> {
    if t.len() < 19 || !matches!(t[10], b'T' | b't' | b' ') {
        return None;
    }
    Some(fast_date(&t[..10])?.and_time(fast_time(&t[11..])?))
}

pub(crate) fn parse_local_date_time(text: &[u8], position: usize) -> Result<NaiveDateTime> {
    if let Some(v) = local_date_time_fast(text) {
        return Ok(v);
    }
    trace!("parsing local date-time at {position} through the generic path");
    core::str::from_utf8(text)
        .ok()
        .and_then(|s| NaiveDateTime::from_str(s).ok())
        .ok_or_else(|| invalid(ErrorKind::InvalidDateTime, text, position))
}

pub fn deserialize_local_date_time(reader: &mut JsonReader<'_>) -> Result<NaiveDateTime> {
    let len = reader.read_simple_quote()?;
    parse_local_date_time(&reader.scratch()[..len], reader.token_start())
}

impl JsonCodec for NaiveDateTime {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_local_date_time(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_local_date_time(reader)
    }
}

/// Writes `"HH:MM:SS[.f…]"` with the fraction trimmed.
pub fn serialize_time(value: &NaiveTime, writer: &mut JsonWriter) {
    let buf = writer.tmp_mut();
    buf[0] = b'"';
    write_clock(&mut buf[1..], value);
    let mut end = 9;
    if value.nanosecond() != 0 {
        end += write_nanos(&mut buf[9..], value.nanosecond());
    }
    buf[end] = b'"';
    writer.write_buffer(end + 1);
}

pub(crate) fn parse_time(text: &[u8], position: usize) -> Result<NaiveTime> {
    if let Some(v) = fast_time(text) {
        return Ok(v);
    }
    trace!("parsing time at {position} through the generic path");
    core::str::from_utf8(text)
        .ok()
        .and_then(|s| NaiveTime::from_str(s).ok())
        .ok_or_else(|| invalid(ErrorKind::InvalidTime, text, position))
}

pub fn deserialize_time(reader: &mut JsonReader<'_>) -> Result<NaiveTime> {
    let len = reader.read_simple_quote()?;
    parse_time(&reader.scratch()[..len], reader.token_start())
}

impl JsonCodec for NaiveTime {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_time(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_time(reader)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use rstest::rstest;

    use super::*;

    fn written<T: JsonCodec>(value: &T) -> String {
        String::from_utf8(crate::serialize(value)).unwrap()
    }

    fn utc(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[rstest]
    #[case("2024-03-09T07:05:03Z", "\"2024-03-09T07:05:03Z\"")]
    #[case("2024-03-09T07:05:03.500Z", "\"2024-03-09T07:05:03.5Z\"")]
    #[case("2024-03-09T07:05:03.540Z", "\"2024-03-09T07:05:03.54Z\"")]
    #[case("2024-03-09T07:05:03.543Z", "\"2024-03-09T07:05:03.543Z\"")]
    #[case("2024-03-09T07:05:03.123Z", "\"2024-03-09T07:05:03.123Z\"")]
    #[case("2024-03-09T07:05:03.007Z", "\"2024-03-09T07:05:03.007Z\"")]
    #[case("2024-03-09T07:05:03.000999Z", "\"2024-03-09T07:05:03Z\"")]
    #[case("0001-01-01T00:00:00+05:30", "\"0001-01-01T00:00:00+05:30\"")]
    #[case("2024-12-31T23:59:59.1-08:00", "\"2024-12-31T23:59:59.1-08:00\"")]
    fn writes_instant(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(written(&utc(value)), expected);
    }

    #[rstest]
    #[case("2024-03-09T07:05:03Z")]
    #[case("2024-03-09t07:05:03.5Z")]
    #[case("2024-03-09 07:05:03.54Z")]
    #[case("2024-03-09T07:05:03.543Z")]
    fn fast_path_matches_chrono(#[case] text: &str) {
        let fast = utc_fast(text.as_bytes()).unwrap();
        let normalized = text.replace(['t', ' '], "T");
        assert_eq!(fast, DateTime::parse_from_rfc3339(&normalized).unwrap());
        assert_eq!(fast.offset().local_minus_utc(), 0);
    }

    #[rstest]
    #[case("2024-03-09T07:05:03+01:00", 3600)]
    #[case("2024-03-09T07:05:03.123456789-05:30", -19800)]
    #[case("2024-03-09T07:05:03.1234Z", 0)]
    #[case("2024-03-09T07:05:03", 0)]
    #[case("2024-03-09T07:05", 0)]
    #[case("2024-03-09", 0)]
    fn generic_path_reads_other_shapes(#[case] text: &str, #[case] offset: i32) {
        assert_eq!(utc_fast(text.as_bytes()), None);
        let value = parse_date_time(text.as_bytes(), 0).unwrap();
        assert_eq!(value.offset().local_minus_utc(), offset);
    }

    #[test]
    fn invalid_instant_reports_token() {
        let err = parse_date_time(b"2024-13-40T00:00:00Z", 6).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::InvalidDateTime("2024-13-40T00:00:00Z".into())
        );
        assert_eq!(err.position(), 6);
        assert!(parse_date_time(b"2024-0a-01T00:00:00Z", 0).is_err());
    }

    #[rstest]
    #[case(3600 + 75, "+01:01:15")]
    #[case(-(4 * 3600 + 56 * 60 + 2), "-04:56:02")]
    #[case(-3600, "-01:00")]
    fn offsets_with_seconds_round_trip(#[case] seconds: i32, #[case] suffix: &str) {
        let offset = FixedOffset::east_opt(seconds).unwrap();
        let value = utc("1880-06-01T12:30:00.25Z").with_timezone(&offset);
        let json = written(&value);
        assert!(json.ends_with(&format!("{suffix}\"")), "{json}");
        let back = crate::deserialize::<DateTime<FixedOffset>>(json.as_bytes()).unwrap();
        assert_eq!(back, value);
        assert_eq!(back.offset(), value.offset());
    }

    #[test]
    fn far_future_years_round_trip() {
        let value = utc("9999-12-31T23:59:59Z") + chrono::Duration::days(1);
        let json = written(&value);
        assert!(json.contains("10000-01-01T23:59:59"), "{json}");
        assert_eq!(crate::deserialize::<DateTime<FixedOffset>>(json.as_bytes()).unwrap(), value);
    }

    #[test]
    fn utc_values_use_z() {
        let value = utc("2020-02-29T12:00:00.250Z").with_timezone(&Utc);
        assert_eq!(written(&value), "\"2020-02-29T12:00:00.25Z\"");
        assert_eq!(crate::deserialize::<DateTime<Utc>>(written(&value).as_bytes()).unwrap(), value);
    }

    #[rstest]
    #[case("\"2024-02-29\"", NaiveDate::from_ymd_opt(2024, 2, 29))]
    #[case("\"0042-01-05\"", NaiveDate::from_ymd_opt(42, 1, 5))]
    #[case("\"+12345-06-07\"", NaiveDate::from_ymd_opt(12345, 6, 7))]
    fn reads_dates(#[case] json: &str, #[case] expected: Option<NaiveDate>) {
        let value = crate::deserialize::<NaiveDate>(json.as_bytes()).unwrap();
        assert_eq!(Some(value), expected);
        assert_eq!(written(&value), json);
    }

    #[test]
    fn invalid_dates() {
        for text in ["2023-02-29", "2024/01/01", "yesterday"] {
            let err = parse_date(text.as_bytes(), 0).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::InvalidDate(_)), "{text}");
        }
    }

    #[rstest]
    #[case(1_000_000, ".001", 4)]
    #[case(500_000_000, ".5", 2)]
    #[case(120_000_000, ".12", 3)]
    #[case(123_000_000, ".123", 4)]
    #[case(123_400_000, ".1234", 5)]
    #[case(123_450_000, ".12345", 6)]
    #[case(100_000, ".0001", 5)]
    #[case(123_456_700, ".1234567", 8)]
    #[case(123_456_789, ".123456789", 10)]
    fn trims_fraction(#[case] nanos: u32, #[case] expected: &str, #[case] len: usize) {
        let mut buf = [0u8; 10];
        assert_eq!(write_nanos(&mut buf, nanos), len);
        assert_eq!(&buf[..len], expected.as_bytes());
    }

    #[rstest]
    #[case("\"2024-03-09T07:05:03\"")]
    #[case("\"2024-03-09T07:05:03.1\"")]
    #[case("\"2024-03-09T07:05:03.000001\"")]
    #[case("\"2024-03-09T07:05:03.123456789\"")]
    fn local_date_time_round_trip(#[case] json: &str) {
        let value = crate::deserialize::<NaiveDateTime>(json.as_bytes()).unwrap();
        assert_eq!(written(&value), json);
    }

    #[test]
    fn local_date_time_generic_forms() {
        let value = parse_local_date_time(b"+10000-01-01T00:00:00.5", 0).unwrap();
        assert_eq!(value.year(), 10000);
        assert_eq!(written(&value), "\"+10000-01-01T00:00:00.500\"");
    }

    #[rstest]
    #[case("\"00:00:00\"")]
    #[case("\"23:59:59.9\"")]
    #[case("\"12:34:56.789012\"")]
    fn time_round_trip(#[case] json: &str) {
        let value = crate::deserialize::<NaiveTime>(json.as_bytes()).unwrap();
        assert_eq!(written(&value), json);
    }

    #[test]
    fn time_fallbacks() {
        assert_eq!(
            parse_time(b"07:05:09.25", 0).unwrap(),
            NaiveTime::from_hms_milli_opt(7, 5, 9, 250).unwrap()
        );
        let err = parse_time(b"25:00:00", 2).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidTime("25:00:00".into()));
    }
}
