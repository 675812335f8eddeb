use bitflags::bitflags;

use crate::encoding::Encoding;

bitflags! {
    /// Attributes collected while a string token is decoded. The parser sets
    /// them incrementally for every codepoint it appends, so by the time the
    /// string event is emitted the caller can inspect the whole token without
    /// rescanning it.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StringAttributes: u8 {
        /// The string contains U+0000.
        const CONTAINS_NULL_CHARACTER = 1 << 0;
        /// The string contains a control character (U+0000–U+001F).
        const CONTAINS_CONTROL_CHARACTER = 1 << 1;
        /// The string contains a codepoint above U+007F.
        const CONTAINS_NON_ASCII_CHARACTER = 1 << 2;
        /// The string contains a codepoint outside the Basic Multilingual
        /// Plane.
        const CONTAINS_NON_BMP_CHARACTER = 1 << 3;
        /// An invalid encoding sequence inside the string was replaced by
        /// U+FFFD.
        const CONTAINS_REPLACED_CHARACTER = 1 << 4;
    }
}

bitflags! {
    /// Attributes describing the shape of a number token. Numbers are never
    /// interpreted numerically; these flags let the caller pick a suitable
    /// representation for the buffered text.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NumberAttributes: u8 {
        const IS_NEGATIVE = 1 << 0;
        const IS_HEX = 1 << 1;
        const CONTAINS_DECIMAL_POINT = 1 << 2;
        const CONTAINS_EXPONENT = 1 << 3;
        const CONTAINS_NEGATIVE_EXPONENT = 1 << 4;
    }
}

/// Accumulates the text of the string or number token currently being
/// lexed, already transcoded to the configured output encoding. The buffer
/// is reused between tokens; it only ever grows.
#[derive(Debug, Default)]
pub(crate) struct TextBuffer {
    bytes: Vec<u8>,
    attributes: StringAttributes,
}

impl TextBuffer {
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.attributes = StringAttributes::empty();
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn attributes(&self) -> StringAttributes {
        self.attributes
    }

    /// Append one codepoint, encoded in `encoding`, and update the attribute
    /// word.
    pub fn append_scalar(&mut self, cp: u32, encoding: Encoding) {
        if cp == 0 {
            self.attributes |= StringAttributes::CONTAINS_NULL_CHARACTER
                | StringAttributes::CONTAINS_CONTROL_CHARACTER;
        } else if cp < 0x20 {
            self.attributes |= StringAttributes::CONTAINS_CONTROL_CHARACTER;
        }
        if cp > 0x7F {
            self.attributes |= StringAttributes::CONTAINS_NON_ASCII_CHARACTER;
        }
        if cp > 0xFFFF {
            self.attributes |= StringAttributes::CONTAINS_NON_BMP_CHARACTER;
        }
        encoding.encode_into(cp, &mut self.bytes);
    }

    /// Append U+FFFD for an invalid input sequence that was replaced.
    pub fn append_replacement(&mut self, encoding: Encoding) {
        self.attributes |= StringAttributes::CONTAINS_REPLACED_CHARACTER;
        self.append_scalar(0xFFFD, encoding);
    }
}

/// Validate `text` against the number grammar the lexer accepts:
/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`, or the hex form
/// `0[xX][0-9a-fA-F]+`.
pub(crate) fn is_valid_number(text: &[u8]) -> bool {
    let mut rest = text;
    if let [b'-', tail @ ..] = rest {
        rest = tail;
    } else if let [b'0', x, tail @ ..] = rest {
        if *x == b'x' || *x == b'X' {
            return !tail.is_empty() && tail.iter().all(u8::is_ascii_hexdigit);
        }
    }

    // integer part
    match rest {
        [b'0', tail @ ..] => rest = tail,
        [b'1'..=b'9', ..] => {
            let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
            rest = &rest[digits..];
        }
        _ => return false,
    }

    if let [b'.', tail @ ..] = rest {
        let digits = tail.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return false;
        }
        rest = &tail[digits..];
    }

    if let [b'e' | b'E', tail @ ..] = rest {
        let mut tail = tail;
        if let [b'+' | b'-', t @ ..] = tail {
            tail = t;
        }
        let digits = tail.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return false;
        }
        rest = &tail[digits..];
    }

    rest.is_empty()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_numbers() {
        for t in [
            "0", "-0", "7", "-7", "10", "3.14159", "-2.5", "0.5", "1e3", "1E3", "1e+3", "1e-3",
            "6.02e23", "0e0", "0x0", "0xDEADbeef", "0X1f",
        ] {
            assert!(is_valid_number(t.as_bytes()), "{t} should be valid");
        }
    }

    #[test]
    fn invalid_numbers() {
        for t in [
            "", "-", "01", "00", "+1", ".5", "1.", "1.e3", "1e", "1e+", "7e-", "0x", "-0x1",
            "0xG", "1 ", " 1", "NaN", "Infinity", "1.2.3", "1e2e3", "--1",
        ] {
            assert!(!is_valid_number(t.as_bytes()), "{t} should be invalid");
        }
    }

    #[test]
    fn buffer_attributes() {
        let mut buf = TextBuffer::default();
        buf.append_scalar(b'a' as u32, Encoding::Utf8);
        assert_eq!(buf.attributes(), StringAttributes::empty());

        buf.append_scalar(0, Encoding::Utf8);
        assert!(buf
            .attributes()
            .contains(StringAttributes::CONTAINS_NULL_CHARACTER));
        assert!(buf
            .attributes()
            .contains(StringAttributes::CONTAINS_CONTROL_CHARACTER));

        buf.append_scalar(0x1D11E, Encoding::Utf8);
        assert!(buf
            .attributes()
            .contains(StringAttributes::CONTAINS_NON_BMP_CHARACTER));
        assert!(buf
            .attributes()
            .contains(StringAttributes::CONTAINS_NON_ASCII_CHARACTER));

        assert_eq!(buf.bytes(), b"a\x00\xF0\x9D\x84\x9E");

        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.attributes(), StringAttributes::empty());
    }
}
