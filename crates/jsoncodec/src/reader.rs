//! Byte-slice reader that hands raw number and string tokens to the codecs.
//!
//! The reader does not understand JSON structure beyond what the codecs need:
//! it skips whitespace to the next value, copies a number or simple string
//! token into its scratch buffer, and decodes escaped strings. The scratch
//! buffer belongs to the reader for its whole lifetime; codecs borrow slices
//! of it and grow it in place when a token does not fit.

use alloc::{string::String, vec, vec::Vec};

use log::debug;

use crate::{
    digits::{HEX_VALUES, INVALID_NIBBLE},
    error::{CodecError, ErrorKind, Result},
    options::{MIN_SCRATCH_SIZE, ReaderOptions},
};

#[inline]
pub(crate) const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

#[inline]
pub(crate) const fn ends_number(b: u8) -> bool {
    matches!(b, b',' | b'}' | b']') || is_whitespace(b)
}

#[derive(Debug)]
pub struct JsonReader<'a> {
    input: &'a [u8],
    current_index: usize,
    token_start: usize,
    last: u8,
    pub(crate) tmp: Vec<u8>,
}

impl<'a> JsonReader<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, ReaderOptions::default())
    }

    #[must_use]
    pub fn with_options(input: &'a [u8], options: ReaderOptions) -> Self {
        Self {
            input,
            current_index: 0,
            token_start: 0,
            last: b' ',
            tmp: vec![0; options.scratch_size.max(MIN_SCRATCH_SIZE)],
        }
    }

    /// Consumes the next raw byte.
    pub fn read(&mut self) -> Result<u8> {
        let Some(&b) = self.input.get(self.current_index) else {
            return Err(CodecError::new(
                ErrorKind::UnexpectedEndOfInput,
                self.current_index,
            ));
        };
        self.current_index += 1;
        self.last = b;
        Ok(b)
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.input.get(self.current_index).copied()
    }

    /// Skips whitespace and consumes the first byte of the next value.
    pub fn next_token(&mut self) -> Result<u8> {
        while self.peek().is_some_and(is_whitespace) {
            self.current_index += 1;
        }
        self.read()
    }

    /// The most recently consumed byte.
    #[inline]
    #[must_use]
    pub fn last(&self) -> u8 {
        self.last
    }

    #[inline]
    #[must_use]
    pub fn is_end_of_stream(&self) -> bool {
        self.current_index >= self.input.len()
    }

    #[inline]
    #[must_use]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[inline]
    #[must_use]
    pub fn position_in_stream(&self) -> usize {
        self.current_index
    }

    /// The scratch buffer; tokens copied by [`read_number`](Self::read_number)
    /// and [`read_simple_quote`](Self::read_simple_quote) start at index 0.
    #[inline]
    #[must_use]
    pub fn scratch(&self) -> &[u8] {
        &self.tmp
    }

    pub(crate) fn grow_scratch(&mut self) {
        let size = self.tmp.len() * 2;
        debug!("growing reader scratch buffer to {size} bytes");
        self.tmp.resize(size, 0);
    }

    pub(crate) fn expecting(&self, expected: &'static str) -> CodecError {
        CodecError::new(
            ErrorKind::Expecting {
                expected,
                found: char::from(self.last),
            },
            self.current_index,
        )
    }

    /// Copies the number token starting at [`last`](Self::last) into the
    /// scratch buffer and returns its length.
    ///
    /// Copying stops before a structural byte, whitespace, or the end of
    /// input, and also when the scratch buffer is full; in that last case
    /// the token may continue past the returned length.
    pub fn read_number(&mut self) -> usize {
        self.token_start = self.current_index.saturating_sub(1);
        self.tmp[0] = self.last;
        let mut len = 1;
        while len < self.tmp.len() {
            match self.peek() {
                Some(b) if !ends_number(b) => {
                    self.tmp[len] = b;
                    self.current_index += 1;
                    len += 1;
                }
                _ => break,
            }
        }
        self.last = self.tmp[len - 1];
        len
    }

    /// Copies the interior of a simple string (no escape processing) into
    /// the scratch buffer and returns its length. The reader must be
    /// positioned on the opening quote.
    pub fn read_simple_quote(&mut self) -> Result<usize> {
        if self.last != b'"' {
            return Err(self.expecting("\""));
        }
        self.token_start = self.current_index;
        let mut len = 0;
        loop {
            let Some(b) = self.peek() else {
                return Err(CodecError::new(
                    ErrorKind::UnclosedString,
                    self.token_start,
                ));
            };
            self.current_index += 1;
            if b == b'"' {
                break;
            }
            if len == self.tmp.len() {
                self.grow_scratch();
            }
            self.tmp[len] = b;
            len += 1;
        }
        self.last = b'"';
        Ok(len)
    }

    pub fn read_simple_string(&mut self) -> Result<String> {
        let len = self.read_simple_quote()?;
        String::from_utf8(self.tmp[..len].to_vec())
            .map_err(|_| CodecError::new(ErrorKind::InvalidUtf8, self.token_start))
    }

    /// Reads a JSON string, decoding escape sequences. The reader must be
    /// positioned on the opening quote.
    pub fn read_string(&mut self) -> Result<String> {
        if self.last != b'"' {
            return Err(self.expecting("\""));
        }
        let start = self.current_index;
        self.token_start = start;
        let mut out = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(CodecError::new(ErrorKind::UnclosedString, start));
            };
            self.current_index += 1;
            match b {
                b'"' => break,
                b'\\' => self.read_escape(&mut out)?,
                _ => out.push(b),
            }
        }
        self.last = b'"';
        String::from_utf8(out).map_err(|_| CodecError::new(ErrorKind::InvalidUtf8, start))
    }

    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let escape_at = self.current_index - 1;
        let Some(esc) = self.peek() else {
            return Err(CodecError::new(ErrorKind::UnclosedString, self.token_start));
        };
        self.current_index += 1;
        let decoded = match esc {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let ch = self.read_unicode_escape(escape_at)?;
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                return Ok(());
            }
            other => {
                return Err(CodecError::new(
                    ErrorKind::InvalidEscape(char::from(other)),
                    escape_at,
                ));
            }
        };
        out.push(decoded);
        Ok(())
    }

    fn read_unicode_escape(&mut self, escape_at: usize) -> Result<char> {
        let first = self
            .hex4_at(self.current_index)
            .ok_or_else(|| CodecError::new(ErrorKind::InvalidEscape('u'), escape_at))?;
        self.current_index += 4;
        let code = match first {
            0xD800..=0xDBFF => {
                let low = self
                    .input
                    .get(self.current_index..self.current_index + 2)
                    .filter(|prefix| *prefix == b"\\u")
                    .and_then(|_| self.hex4_at(self.current_index + 2))
                    .filter(|low| (0xDC00..=0xDFFF).contains(low));
                match low {
                    Some(low) => {
                        self.current_index += 6;
                        0x1_0000 + ((first - 0xD800) << 10) + (low - 0xDC00)
                    }
                    None => u32::from(char::REPLACEMENT_CHARACTER),
                }
            }
            _ => first,
        };
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn hex4_at(&self, at: usize) -> Option<u32> {
        let digits = self.input.get(at..at + 4)?;
        digits.iter().try_fold(0u32, |acc, &b| {
            let nibble = HEX_VALUES[b as usize];
            (nibble != INVALID_NIBBLE).then(|| (acc << 4) | u32::from(nibble))
        })
    }

    /// Returns `true` and consumes the literal when the reader is positioned
    /// on `null`. A value starting with `n` that is not `null` is an error.
    pub fn was_null(&mut self) -> Result<bool> {
        if self.last != b'n' {
            return Ok(false);
        }
        let rest = self.input.get(self.current_index..self.current_index + 3);
        if rest == Some(&b"ull"[..]) {
            self.current_index += 3;
            self.last = b'l';
            Ok(true)
        } else {
            Err(CodecError::new(
                ErrorKind::InvalidNull,
                self.current_index - 1,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_token_skips_whitespace() {
        let mut reader = JsonReader::new(b" \t\r\n 42");
        assert_eq!(reader.next_token().unwrap(), b'4');
        assert_eq!(reader.last(), b'4');
        assert_eq!(reader.current_index(), 6);
    }

    #[test]
    fn next_token_at_end_of_input() {
        let mut reader = JsonReader::new(b"   ");
        let err = reader.next_token().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnexpectedEndOfInput);
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn read_number_stops_at_structural_bytes() {
        let mut reader = JsonReader::new(b"[-12.5e3, 7]");
        reader.next_token().unwrap();
        reader.next_token().unwrap();
        let len = reader.read_number();
        assert_eq!(&reader.scratch()[..len], b"-12.5e3");
        assert_eq!(reader.token_start(), 1);
        assert_eq!(reader.next_token().unwrap(), b',');
    }

    #[test]
    fn read_number_stops_when_scratch_is_full() {
        let input = b"123456789012345678901234567890";
        let mut reader = JsonReader::with_options(input, ReaderOptions { scratch_size: 1 });
        reader.next_token().unwrap();
        let len = reader.read_number();
        assert_eq!(len, MIN_SCRATCH_SIZE);
        assert!(!reader.is_end_of_stream());
    }

    #[test]
    fn simple_quote_grows_scratch() {
        let body = "x".repeat(100);
        let input = alloc::format!("\"{body}\"");
        let mut reader = JsonReader::new(input.as_bytes());
        reader.next_token().unwrap();
        let len = reader.read_simple_quote().unwrap();
        assert_eq!(&reader.scratch()[..len], body.as_bytes());
        assert!(reader.is_end_of_stream());
    }

    #[test]
    fn simple_quote_requires_closing_quote() {
        let mut reader = JsonReader::new(b"\"abc");
        reader.next_token().unwrap();
        let err = reader.read_simple_quote().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnclosedString);
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn read_string_decodes_escapes() {
        let mut reader = JsonReader::new(r#""a\"b\\c\/\n\té😀""#.as_bytes());
        reader.next_token().unwrap();
        assert_eq!(reader.read_string().unwrap(), "a\"b\\c/\n\té😀");
    }

    #[test]
    fn read_string_replaces_lone_surrogate() {
        let mut reader = JsonReader::new(br#""\ud83dx""#);
        reader.next_token().unwrap();
        assert_eq!(reader.read_string().unwrap(), "\u{FFFD}x");
    }

    #[test]
    fn read_string_rejects_unknown_escape() {
        let mut reader = JsonReader::new(br#""ab\q""#);
        reader.next_token().unwrap();
        let err = reader.read_string().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidEscape('q'));
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn was_null_consumes_literal() {
        let mut reader = JsonReader::new(b"null");
        reader.next_token().unwrap();
        assert!(reader.was_null().unwrap());
        assert!(reader.is_end_of_stream());

        let mut reader = JsonReader::new(b"nul");
        reader.next_token().unwrap();
        assert_eq!(reader.was_null().unwrap_err().kind(), &ErrorKind::InvalidNull);

        let mut reader = JsonReader::new(b"1");
        reader.next_token().unwrap();
        assert!(!reader.was_null().unwrap());
    }
}
