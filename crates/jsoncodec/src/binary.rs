//! Byte arrays as quoted standard (padded) base64.

use alloc::vec::Vec;

use base64::{Engine as _, display::Base64Display, engine::general_purpose::STANDARD};
use bstr::BString;
use log::trace;

use crate::{
    JsonCodec, JsonReader, JsonWriter,
    error::{CodecError, ErrorKind, Result},
};

pub fn serialize_binary(value: &[u8], writer: &mut JsonWriter) {
    writer.write_byte(b'"');
    writer.write_display(Base64Display::new(value, &STANDARD));
    writer.write_byte(b'"');
}

pub fn serialize_nullable_binary(value: Option<&[u8]>, writer: &mut JsonWriter) {
    match value {
        Some(v) => serialize_binary(v, writer),
        None => writer.write_null(),
    }
}

pub fn deserialize_binary(reader: &mut JsonReader<'_>) -> Result<Vec<u8>> {
    let len = reader.read_simple_quote()?;
    let text = &reader.scratch()[..len];
    STANDARD.decode(text).map_err(|e| {
        trace!("rejected base64 at {}: {e}", reader.token_start());
        CodecError::new(
            ErrorKind::InvalidBase64(BString::from(text)),
            reader.token_start(),
        )
    })
}

impl JsonCodec for Vec<u8> {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_binary(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_binary(reader)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use rstest::rstest;

    use super::*;

    fn written(value: &[u8]) -> String {
        let mut writer = JsonWriter::new();
        serialize_binary(value, &mut writer);
        String::from_utf8(writer.into_bytes()).unwrap()
    }

    #[rstest]
    #[case(b"", "\"\"")]
    #[case(b"h", "\"aA==\"")]
    #[case(b"he", "\"aGU=\"")]
    #[case(b"hello", "\"aGVsbG8=\"")]
    #[case(&[0xfb, 0xff], "\"+/8=\"")]
    fn writes_padded_standard_alphabet(#[case] value: &[u8], #[case] json: &str) {
        assert_eq!(written(value), json);
        assert_eq!(crate::deserialize::<Vec<u8>>(json.as_bytes()).unwrap(), value);
    }

    #[test]
    fn every_byte_value_round_trips() {
        let value: Vec<u8> = (0..=255).collect();
        let json = crate::serialize(&value);
        assert_eq!(json.len(), 2 + 344);
        assert_eq!(crate::deserialize::<Vec<u8>>(&json).unwrap(), value);
    }

    #[rstest]
    #[case("\"abc*\"")]
    #[case("\"QQ\"")]
    #[case("\"aGVsbG8\"")]
    #[case("\"aGVs bG8=\"")]
    #[case("\"-_8=\"")]
    fn malformed_text_is_rejected(#[case] json: &str) {
        let err = crate::deserialize::<Vec<u8>>(json.as_bytes()).unwrap_err();
        let interior = &json[1..json.len() - 1];
        assert_eq!(err.kind(), &ErrorKind::InvalidBase64(interior.into()));
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn nullable_writes_null() {
        let mut writer = JsonWriter::new();
        serialize_nullable_binary(None, &mut writer);
        serialize_nullable_binary(Some(b"ok"), &mut writer);
        assert_eq!(writer.as_bytes(), b"null\"b2s=\"");
        assert_eq!(crate::deserialize::<Option<Vec<u8>>>(b"null").unwrap(), None);
    }

    #[test]
    fn unquoted_value_is_rejected() {
        let err = crate::deserialize::<Vec<u8>>(b"[1,2]").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Expecting { expected: "\"", .. }));
    }
}
