use alloc::string::String;

use crate::{JsonCodec, JsonReader, JsonWriter, error::Result};

pub fn serialize_string(value: &str, writer: &mut JsonWriter) {
    writer.write_string(value);
}

pub fn serialize_nullable_string(value: Option<&str>, writer: &mut JsonWriter) {
    match value {
        Some(v) => writer.write_string(v),
        None => writer.write_null(),
    }
}

pub fn deserialize_string(reader: &mut JsonReader<'_>) -> Result<String> {
    reader.read_string()
}

/// Reads a string, or `None` for the `null` literal.
pub fn deserialize_nullable_string(reader: &mut JsonReader<'_>) -> Result<Option<String>> {
    if reader.was_null()? {
        return Ok(None);
    }
    reader.read_string().map(Some)
}

impl JsonCodec for String {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_string(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_string(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn nullable_strings() {
        let mut writer = JsonWriter::new();
        serialize_nullable_string(Some("tab\there"), &mut writer);
        writer.write_byte(b',');
        serialize_nullable_string(None, &mut writer);
        assert_eq!(writer.as_bytes(), br#""tab\there",null"#);

        let mut reader = JsonReader::new(writer.as_bytes());
        reader.next_token().unwrap();
        assert_eq!(
            deserialize_nullable_string(&mut reader).unwrap().as_deref(),
            Some("tab\there")
        );
        assert_eq!(reader.next_token().unwrap(), b',');
        reader.next_token().unwrap();
        assert_eq!(deserialize_nullable_string(&mut reader).unwrap(), None);
    }

    #[test]
    fn requires_opening_quote() {
        let err = crate::deserialize::<String>(b"abc").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::Expecting {
                expected: "\"",
                found: 'a'
            }
        );
    }
}
