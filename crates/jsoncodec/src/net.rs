//! Network address and URI codecs. Both are plain strings on the wire.

use alloc::string::String;
use core::{fmt, net::IpAddr, str::FromStr};

use bstr::BString;

use crate::{
    JsonCodec, JsonReader, JsonWriter,
    error::{CodecError, ErrorKind, Result},
};

/// A URI carried as text. No validation is performed on read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uri(String);

impl Uri {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Uri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Uri {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

pub fn serialize_uri(value: &Uri, writer: &mut JsonWriter) {
    writer.write_string(value.as_str());
}

pub fn deserialize_uri(reader: &mut JsonReader<'_>) -> Result<Uri> {
    reader.read_string().map(Uri)
}

impl JsonCodec for Uri {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_uri(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_uri(reader)
    }
}

/// Writes the address in its canonical textual form, quoted.
pub fn serialize_ip(value: &IpAddr, writer: &mut JsonWriter) {
    writer.write_byte(b'"');
    writer.write_display(value);
    writer.write_byte(b'"');
}

/// Reads a literal IPv4 or IPv6 address. Host names are not resolved.
pub fn deserialize_ip(reader: &mut JsonReader<'_>) -> Result<IpAddr> {
    let len = reader.read_simple_quote()?;
    let text = &reader.scratch()[..len];
    core::str::from_utf8(text)
        .ok()
        .and_then(|s| IpAddr::from_str(s).ok())
        .ok_or_else(|| {
            CodecError::new(
                ErrorKind::InvalidIpAddress(BString::from(text)),
                reader.token_start(),
            )
        })
}

impl JsonCodec for IpAddr {
    fn write_json(&self, writer: &mut JsonWriter) {
        serialize_ip(self, writer);
    }

    fn read_json(reader: &mut JsonReader<'_>) -> Result<Self> {
        deserialize_ip(reader)
    }
}
