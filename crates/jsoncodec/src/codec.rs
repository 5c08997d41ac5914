use alloc::vec::Vec;

use crate::{JsonReader, JsonWriter, error::Result};

/// A type with a JSON text encoding.
///
/// `read_json` expects the reader to be positioned on the first byte of the
/// value, which is where [`JsonReader::next_token`] leaves it.
pub trait JsonCodec: Sized {
    fn write_json(&self, writer: &mut JsonWriter);

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self>;
}

/// `None` is written as `null`, and `null` reads back as `None`.
impl<T: JsonCodec> JsonCodec for Option<T> {
    fn write_json(&self, writer: &mut JsonWriter) {
        match self {
            Some(value) => value.write_json(writer),
            None => writer.write_null(),
        }
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        if reader.was_null()? {
            return Ok(None);
        }
        T::read_json(reader).map(Some)
    }
}

pub fn serialize_into<T: JsonCodec>(value: &T, writer: &mut JsonWriter) {
    value.write_json(writer);
}

#[must_use]
pub fn serialize<T: JsonCodec>(value: &T) -> Vec<u8> {
    let mut writer = JsonWriter::new();
    value.write_json(&mut writer);
    writer.into_bytes()
}

/// Reads one value from the start of `input`, skipping leading whitespace.
/// Bytes after the value are left unread.
pub fn deserialize<T: JsonCodec>(input: &[u8]) -> Result<T> {
    let mut reader = JsonReader::new(input);
    reader.next_token()?;
    T::read_json(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn options_use_null() {
        assert_eq!(serialize(&None::<i32>), b"null");
        assert_eq!(serialize(&Some(12i64)), b"12");
        assert_eq!(deserialize::<Option<i32>>(b" null").unwrap(), None);
        assert_eq!(deserialize::<Option<i32>>(b"-4").unwrap(), Some(-4));
        assert_eq!(
            deserialize::<Option<i32>>(b"nil").unwrap_err().kind(),
            &ErrorKind::InvalidNull
        );
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = deserialize::<i64>(b"  ").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn serialize_into_appends() {
        let mut writer = JsonWriter::new();
        serialize_into(&1i32, &mut writer);
        writer.write_byte(b',');
        serialize_into(&2.5f64, &mut writer);
        assert_eq!(writer.as_bytes(), b"1,2.5");
    }
}
