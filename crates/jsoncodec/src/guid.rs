//! UUID codec: quoted lowercase `8-4-4-4-12` on write; dashed, undashed and
//! anything [`Uuid::parse_str`] understands on read.

use bstr::BString;
use log::trace;
use uuid::Uuid;

use crate::{
    JsonCodec, JsonReader, JsonWriter,
    digits::{HEX_VALUES, INVALID_NIBBLE, write_hex_byte},
    error::{CodecError, ErrorKind, Result},
};

/// Quoted canonical form: 36 characters plus two quotes.
pub const UUID_JSON_LEN: usize = 38;

const DASHES: [usize; 4] = [8, 13, 18, 23];

pub fn serialize_uuid(value: &Uuid, writer: &mut JsonWriter) {
    let buf = writer.tmp_mut();
    buf[0] = b'"';
    let mut pos = 1;
    for (i, &byte) in value.as_bytes().iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            buf[pos] = b'-';
            pos += 1;
        }
        write_hex_byte(byte, &mut buf[pos..]);
        pos += 2;
    }
    buf[pos] = b'"';
    writer.write_buffer(UUID_JSON_LEN);
}

pub fn serialize_nullable_uuid(value: Option<&Uuid>, writer: &mut JsonWriter) {
    match value {
        Some(v) => serialize_uuid(v, writer),
        None => writer.write_null(),
    }
}

/// Folds 32 hex digits into a `u128`; `None` on the first invalid digit.
fn decode_nibbles<'a>(mut digits: impl Iterator<Item = &'a u8>) -> Option<u128> {
    digits.try_fold(0u128, |acc, &b| {
        let nibble = HEX_VALUES[b as usize];
        (nibble != INVALID_NIBBLE).then(|| (acc << 4) | u128::from(nibble))
    })
}

fn decode_fast(text: &[u8]) -> Option<u128> {
    match text.len() {
        36 if DASHES.iter().all(|&i| text[i] == b'-') => decode_nibbles(
            text.iter()
                .enumerate()
                .filter(|(i, _)| !DASHES.contains(i))
                .map(|(_, b)| b),
        ),
        32 => decode_nibbles(text.iter()),
        _ => None,
    }
}

pub(crate) fn parse_uuid_generic(text: &[u8], position: usize) -> Result<Uuid> {
    trace!("parsing UUID at {position} through the generic path");
    core::str::from_utf8(text)
        .ok()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| CodecError::new(ErrorKind::InvalidUuid(BString::from(text)), position))
}

/// Decodes the unquoted text of a UUID.
pub(crate) fn parse_uuid(text: &[u8], position: usize) -> Result<Uuid> {
    match decode_fast(text) {
        Some(v) => Ok(Uuid::from_u128(v)),
        None => parse_uuid_generic(text, position),
    }
}

pub fn deserialize_uuid(reader: &mut JsonReader<'_>) -> Result<Uuid> {
    let len = reader.read_simple_quote()?;
    parse_uuid(&reader.scratch()[..len], reader.token_start())
}

impl JsonCodec for Uuid {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_uuid(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_uuid(reader)
    }
}
