use bigdecimal::BigDecimal;
use bstr::BString;
use thiserror::Error;

/// Error raised by a codec while reading a value.
///
/// `position` is the byte offset of the start of the offending token, so
/// failures detected after reading ahead still point at the token itself.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at position {position}")]
pub struct CodecError {
    pub(crate) kind: ErrorKind,
    pub(crate) position: usize,
}

impl CodecError {
    pub(crate) fn new(kind: ErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("invalid number '{0}'")]
    InvalidNumber(BString),
    #[error("invalid floating-point number '{0}'")]
    InvalidFloat(BString),
    /// An integer was expected but the token carries a fractional part.
    #[error("found decimal value {0} where an integer was expected")]
    DecimalWhereIntegerExpected(BigDecimal),
    #[error("number {value} does not fit in {target}")]
    NumberOutOfRange {
        value: BigDecimal,
        target: &'static str,
    },
    #[error("invalid UUID '{0}'")]
    InvalidUuid(BString),
    #[error("invalid date-time '{0}'")]
    InvalidDateTime(BString),
    #[error("invalid date '{0}'")]
    InvalidDate(BString),
    #[error("invalid time '{0}'")]
    InvalidTime(BString),
    #[error("invalid IP address '{0}'")]
    InvalidIpAddress(BString),
    #[error("invalid base64 '{0}'")]
    InvalidBase64(BString),
    #[error("expecting '{expected}', found '{found}'")]
    Expecting { expected: &'static str, found: char },
    #[error("invalid null literal")]
    InvalidNull,
    #[error("string was not closed with a double quote")]
    UnclosedString,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

pub type Result<T, E = CodecError> = core::result::Result<T, E>;
