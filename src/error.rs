use std::fmt;
use std::io;

use thiserror::Error;

use crate::location::Location;

/// The kinds of errors the parser and the writer can report.
///
/// The numeric codes and their order are stable; [`ErrorKind::as_str()`]
/// returns the matching entry of the static error-string table and
/// [`ErrorKind::from_code()`] is the reverse lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// No error has occurred.
    None = 0,

    /// An allocation failed.
    OutOfMemory = 1,

    /// The output handler aborted the operation.
    AbortedByHandler = 2,

    /// The input begins with a byte-order mark but BOMs are not allowed.
    BomNotAllowed = 3,

    /// The input contains a byte sequence that is not valid in the input
    /// encoding, or the input encoding could not be determined.
    InvalidEncodingSequence = 4,

    /// The input contains a sequence of characters that does not begin any
    /// JSON token.
    UnknownToken = 5,

    /// The input contains a token that is not allowed at its position.
    UnexpectedToken = 6,

    /// The input ends in the middle of a token.
    IncompleteToken = 7,

    /// The input ends although more tokens are required to complete the
    /// document.
    ExpectedMoreTokens = 8,

    /// A string contains an unescaped control character.
    UnescapedControlCharacter = 9,

    /// A string contains an invalid escape sequence.
    InvalidEscapeSequence = 10,

    /// A string contains a `\u` escape sequence that encodes an unmatched
    /// UTF-16 surrogate.
    UnpairedSurrogateEscapeSequence = 11,

    /// A string is longer than the configured maximum.
    TooLongString = 12,

    /// The input contains an invalid number.
    InvalidNumber = 13,

    /// A number is longer than the configured maximum.
    TooLongNumber = 14,

    /// An object contains two members with the same name.
    DuplicateObjectMember = 15,

    /// The parser already stopped after an embedded document.
    StoppedAfterEmbeddedDocument = 16,
}

impl ErrorKind {
    /// Return the static description for this error kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::None => "no error",
            ErrorKind::OutOfMemory => "could not allocate enough memory",
            ErrorKind::AbortedByHandler => "the operation was aborted by a handler",
            ErrorKind::BomNotAllowed => {
                "the input begins with a byte-order mark, which is not allowed"
            }
            ErrorKind::InvalidEncodingSequence => {
                "the input contains a byte or sequence of bytes that is not valid in the \
                 input encoding"
            }
            ErrorKind::UnknownToken => "the input contains an unknown token",
            ErrorKind::UnexpectedToken => "the input contains an unexpected token",
            ErrorKind::IncompleteToken => "the input ends in the middle of a token",
            ErrorKind::ExpectedMoreTokens => "the input ends when more tokens were expected",
            ErrorKind::UnescapedControlCharacter => {
                "the input contains a string containing an unescaped control character"
            }
            ErrorKind::InvalidEscapeSequence => {
                "the input contains a string containing an invalid escape sequence"
            }
            ErrorKind::UnpairedSurrogateEscapeSequence => {
                "the input contains a string containing an unmatched UTF-16 surrogate escape \
                 sequence"
            }
            ErrorKind::TooLongString => "the input contains a string that is too long",
            ErrorKind::InvalidNumber => "the input contains an invalid number",
            ErrorKind::TooLongNumber => "the input contains a number that is too long",
            ErrorKind::DuplicateObjectMember => {
                "the input contains an object with a duplicate member"
            }
            ErrorKind::StoppedAfterEmbeddedDocument => {
                "the parser stopped after parsing an embedded document"
            }
        }
    }

    /// Return the stable numeric code of this error kind.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up an error kind by its stable numeric code.
    pub fn from_code(code: u8) -> Option<ErrorKind> {
        Some(match code {
            0 => ErrorKind::None,
            1 => ErrorKind::OutOfMemory,
            2 => ErrorKind::AbortedByHandler,
            3 => ErrorKind::BomNotAllowed,
            4 => ErrorKind::InvalidEncodingSequence,
            5 => ErrorKind::UnknownToken,
            6 => ErrorKind::UnexpectedToken,
            7 => ErrorKind::IncompleteToken,
            8 => ErrorKind::ExpectedMoreTokens,
            9 => ErrorKind::UnescapedControlCharacter,
            10 => ErrorKind::InvalidEscapeSequence,
            11 => ErrorKind::UnpairedSurrogateEscapeSequence,
            12 => ErrorKind::TooLongString,
            13 => ErrorKind::InvalidNumber,
            14 => ErrorKind::TooLongNumber,
            15 => ErrorKind::DuplicateObjectMember,
            16 => ErrorKind::StoppedAfterEmbeddedDocument,
            _ => return None,
        })
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error that can happen during parsing. The location is frozen at the
/// first byte at which the error was detected; the parser consumes no bytes
/// past it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} (line {}, column {}, byte {})", .location.line, .location.column, .location.byte)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub location: Location,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, location: Location) -> Self {
        ParseError { kind, location }
    }
}

/// An error that can happen while writing JSON output.
#[derive(Error, Debug)]
pub enum WriteError {
    /// The requested operation is not legal in the writer's current state.
    #[error("the operation would produce a misplaced token")]
    UnexpectedToken,

    /// The text passed to `write_number` is not a valid JSON number.
    #[error("the text to write is not a valid number")]
    InvalidNumber,

    /// The text passed to a write operation is not valid in its source
    /// encoding.
    #[error("the text to write contains a byte or sequence of bytes that is not valid in \
             its encoding")]
    InvalidEncodingSequence,

    /// The output handler failed; the writer treats this as an abort.
    #[error("the output handler aborted the write: {0}")]
    Aborted(#[from] io::Error),
}

impl WriteError {
    /// The [`ErrorKind`] corresponding to this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WriteError::UnexpectedToken => ErrorKind::UnexpectedToken,
            WriteError::InvalidNumber => ErrorKind::InvalidNumber,
            WriteError::InvalidEncodingSequence => ErrorKind::InvalidEncodingSequence,
            WriteError::Aborted(_) => ErrorKind::AbortedByHandler,
        }
    }

    pub(crate) fn from_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidNumber => WriteError::InvalidNumber,
            ErrorKind::InvalidEncodingSequence => WriteError::InvalidEncodingSequence,
            ErrorKind::AbortedByHandler => WriteError::Aborted(io::Error::new(
                io::ErrorKind::Other,
                "a previous write was aborted by the output handler",
            )),
            _ => WriteError::UnexpectedToken,
        }
    }
}

#[cfg(test)]
mod test {
    use super::ErrorKind;

    /// Test that the numeric codes round-trip through the table
    #[test]
    fn codes_round_trip() {
        for code in 0..=16u8 {
            let kind = ErrorKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
            assert!(!kind.as_str().is_empty());
        }
        assert_eq!(ErrorKind::from_code(17), None);
    }

    /// Test a few fixed positions of the table
    #[test]
    fn table_order() {
        assert_eq!(ErrorKind::None.code(), 0);
        assert_eq!(ErrorKind::AbortedByHandler.code(), 2);
        assert_eq!(ErrorKind::UnknownToken.code(), 5);
        assert_eq!(ErrorKind::TooLongString.code(), 12);
        assert_eq!(ErrorKind::StoppedAfterEmbeddedDocument.code(), 16);
    }
}
