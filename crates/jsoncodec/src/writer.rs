use alloc::vec::Vec;
use core::fmt;

use crate::{digits::write_hex_byte, options::WriterOptions};

/// Size of the composition region shared with the codecs.
pub const TMP_SIZE: usize = 64;

/// Output buffer plus a fixed scratch region that codecs compose into before
/// flushing with [`write_buffer`](Self::write_buffer).
#[derive(Debug, Clone)]
pub struct JsonWriter {
    result: Vec<u8>,
    tmp: [u8; TMP_SIZE],
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default())
    }

    #[must_use]
    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            result: Vec::with_capacity(options.initial_capacity),
            tmp: [0; TMP_SIZE],
        }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        self.result.push(b);
    }

    /// Appends bytes that are already valid JSON text.
    #[inline]
    pub fn write_ascii(&mut self, s: &str) {
        self.result.extend_from_slice(s.as_bytes());
    }

    #[inline]
    pub fn write_null(&mut self) {
        self.result.extend_from_slice(b"null");
    }

    /// Flushes `tmp[..len]`.
    #[inline]
    pub fn write_buffer(&mut self, len: usize) {
        self.result.extend_from_slice(&self.tmp[..len]);
    }

    /// Flushes `tmp[start..end]`.
    #[inline]
    pub fn write_buffer_range(&mut self, start: usize, end: usize) {
        self.result.extend_from_slice(&self.tmp[start..end]);
    }

    #[inline]
    pub fn tmp_mut(&mut self) -> &mut [u8; TMP_SIZE] {
        &mut self.tmp
    }

    /// Writes `value` as a quoted JSON string.
    pub fn write_string(&mut self, value: &str) {
        self.result.reserve(value.len() + 2);
        self.result.push(b'"');
        let bytes = value.as_bytes();
        let mut start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let short = match b {
                b'"' => b'"',
                b'\\' => b'\\',
                b'\n' => b'n',
                b'\r' => b'r',
                b'\t' => b't',
                0x08 => b'b',
                0x0C => b'f',
                0x00..=0x1F => 0,
                _ => continue,
            };
            self.result.extend_from_slice(&bytes[start..i]);
            start = i + 1;
            if short == 0 {
                let mut escape = *b"\\u0000";
                write_hex_byte(b, &mut escape[4..]);
                self.result.extend_from_slice(&escape);
            } else {
                self.result.extend_from_slice(&[b'\\', short]);
            }
        }
        self.result.extend_from_slice(&bytes[start..]);
        self.result.push(b'"');
    }

    /// Formats `value` straight into the output buffer.
    pub fn write_display(&mut self, value: impl fmt::Display) {
        // Writing into a Vec cannot fail.
        let _ = fmt::Write::write_fmt(&mut Adapter(&mut self.result), format_args!("{value}"));
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.result
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.result
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.result.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Clears the output, keeping its allocation.
    pub fn reset(&mut self) {
        self.result.clear();
    }
}

struct Adapter<'a>(&'a mut Vec<u8>);

impl fmt::Write for Adapter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
