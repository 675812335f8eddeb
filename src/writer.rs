use std::io::Write;

use crate::container::{Container, ContainerKind, ContainerState};
use crate::encoding::{decode_slice, Encoding};
use crate::error::{ErrorKind, WriteError};
use crate::event::SpecialNumber;
use crate::options::JsonWriterOptions;
use crate::text::is_valid_number;

/// The mirror image of the parser: a state machine that accepts one
/// token-emission call at a time and produces a well-formed, properly
/// escaped JSON byte stream in the configured output encoding.
///
/// Output is delivered to the sink in slices that never split an encoding
/// unit. The writer validates every call against its container stack; an
/// operation that would produce a misplaced token fails with
/// [`WriteError::UnexpectedToken`] and produces no output. After any error
/// the writer is stuck in the error state until [`reset()`](Self::reset())
/// is called.
///
/// Punctuation between values is the caller's job: the writer emits commas
/// and colons only through [`write_comma()`](Self::write_comma()) and
/// [`write_colon()`](Self::write_colon()), which lets the caller interleave
/// whitespace freely for pretty-printed output.
///
/// ```
/// use jaxon::JsonWriter;
///
/// let mut out = Vec::new();
/// let mut writer = JsonWriter::new(&mut out);
/// writer.write_start_object().unwrap();
/// writer.write_str("pi").unwrap();
/// writer.write_colon().unwrap();
/// writer.write_number(b"3.14159", Default::default()).unwrap();
/// writer.write_end_object().unwrap();
///
/// assert_eq!(out, br#"{"pi":3.14159}"#);
/// ```
pub struct JsonWriter<W> {
    pub sink: W,

    options: JsonWriterOptions,
    stack: Vec<Container>,
    /// `true` once the top-level value has been written
    document_done: bool,
    failed: Option<ErrorKind>,

    /// Assembles the output of one write call before it goes to the sink
    scratch: Vec<u8>,
    /// Scalar values decoded from the caller's source text
    decoded: Vec<u32>,
}

impl<W> JsonWriter<W>
where
    W: Write,
{
    /// Create a new JSON writer that emits UTF-8 to the given sink
    pub fn new(sink: W) -> Self {
        Self::new_with_options(sink, JsonWriterOptions::default())
    }

    /// Create a new JSON writer using the given [`JsonWriterOptions`]
    pub fn new_with_options(sink: W, options: JsonWriterOptions) -> Self {
        JsonWriter {
            sink,
            options,
            stack: vec![],
            document_done: false,
            failed: None,
            scratch: vec![],
            decoded: vec![],
        }
    }

    /// Return the writer to its pre-document state, keeping the sink and the
    /// options.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.document_done = false;
        self.failed = None;
    }

    /// The options this writer was created with.
    pub fn options(&self) -> &JsonWriterOptions {
        &self.options
    }

    /// The error state, if a write has failed.
    pub fn error(&self) -> Option<ErrorKind> {
        self.failed
    }

    /// Write `null`.
    pub fn write_null(&mut self) -> Result<(), WriteError> {
        self.write_keyword("null")
    }

    /// Write `true` or `false`.
    pub fn write_boolean(&mut self, value: bool) -> Result<(), WriteError> {
        self.write_keyword(if value { "true" } else { "false" })
    }

    /// Write `NaN`, `Infinity` or `-Infinity`.
    pub fn write_special_number(&mut self, value: SpecialNumber) -> Result<(), WriteError> {
        self.write_keyword(value.as_str())
    }

    /// Write a string token. `bytes` is the unescaped text in
    /// `source_encoding`; the writer validates it, escapes what must be
    /// escaped and emits it in the output encoding, including the
    /// surrounding quotes. In a position where an object member name is
    /// expected, the string is the member name.
    pub fn write_string(
        &mut self,
        bytes: &[u8],
        source_encoding: Encoding,
    ) -> Result<(), WriteError> {
        self.check()?;
        let is_name = self.stack.last().is_some_and(Container::expects_name);
        if !is_name && !self.value_legal() {
            return Err(self.fail(WriteError::UnexpectedToken));
        }

        self.decoded.clear();
        let replace = self.options.replace_invalid_encoding_sequences;
        if decode_slice(bytes, source_encoding, replace, &mut self.decoded).is_err() {
            return Err(self.fail(WriteError::InvalidEncodingSequence));
        }

        let out = self.options.output_encoding;
        let escape_all = self.options.escape_all_non_ascii;
        self.scratch.clear();
        out.encode_into(0x22, &mut self.scratch);
        for &cp in &self.decoded {
            match cp {
                0x22 => push_ascii(out, &mut self.scratch, "\\\""),
                0x5C => push_ascii(out, &mut self.scratch, "\\\\"),
                0x00..=0x1F => push_escape_unit(out, &mut self.scratch, cp as u16),
                // escaped for Javascript compatibility
                0x2028 | 0x2029 => push_escape_unit(out, &mut self.scratch, cp as u16),
                _ if escape_all && cp > 0x7F => {
                    if cp > 0xFFFF {
                        let v = cp - 0x10000;
                        push_escape_unit(out, &mut self.scratch, 0xD800 | (v >> 10) as u16);
                        push_escape_unit(out, &mut self.scratch, 0xDC00 | (v & 0x3FF) as u16);
                    } else {
                        push_escape_unit(out, &mut self.scratch, cp as u16);
                    }
                }
                _ => out.encode_into(cp, &mut self.scratch),
            }
        }
        out.encode_into(0x22, &mut self.scratch);
        self.emit()?;

        if is_name {
            if let Some(top) = self.stack.last_mut() {
                top.state = ContainerState::AfterName;
            }
        } else {
            self.end_value();
        }
        Ok(())
    }

    /// Write a string token from UTF-8 text.
    pub fn write_str(&mut self, text: &str) -> Result<(), WriteError> {
        self.write_string(text.as_bytes(), Encoding::Utf8)
    }

    /// Write a number token. `bytes` is the number text in
    /// `source_encoding`. The text is validated against the number grammar
    /// (the hex form included) and emitted unchanged in the output encoding;
    /// the writer never reinterprets the digits.
    pub fn write_number(
        &mut self,
        bytes: &[u8],
        source_encoding: Encoding,
    ) -> Result<(), WriteError> {
        self.check()?;
        if !self.value_legal() {
            return Err(self.fail(WriteError::UnexpectedToken));
        }

        // numbers are never subject to replacement
        self.decoded.clear();
        if decode_slice(bytes, source_encoding, false, &mut self.decoded).is_err() {
            return Err(self.fail(WriteError::InvalidEncodingSequence));
        }
        let mut text = Vec::with_capacity(self.decoded.len());
        for &cp in &self.decoded {
            if cp > 0x7F {
                return Err(self.fail(WriteError::InvalidNumber));
            }
            text.push(cp as u8);
        }
        if !is_valid_number(&text) {
            return Err(self.fail(WriteError::InvalidNumber));
        }

        let out = self.options.output_encoding;
        self.scratch.clear();
        for &b in &text {
            out.encode_into(b as u32, &mut self.scratch);
        }
        self.emit()?;
        self.end_value();
        Ok(())
    }

    /// Write `{`.
    pub fn write_start_object(&mut self) -> Result<(), WriteError> {
        self.write_open(ContainerKind::Object, 0x7B)
    }

    /// Write `}`.
    pub fn write_end_object(&mut self) -> Result<(), WriteError> {
        self.write_close(ContainerKind::Object, 0x7D)
    }

    /// Write `[`.
    pub fn write_start_array(&mut self) -> Result<(), WriteError> {
        self.write_open(ContainerKind::Array, 0x5B)
    }

    /// Write `]`.
    pub fn write_end_array(&mut self) -> Result<(), WriteError> {
        self.write_close(ContainerKind::Array, 0x5D)
    }

    /// Write the colon separating a member name from its value.
    pub fn write_colon(&mut self) -> Result<(), WriteError> {
        self.check()?;
        match self.stack.last_mut() {
            Some(top)
                if top.kind == ContainerKind::Object
                    && top.state == ContainerState::AfterName =>
            {
                top.state = ContainerState::AfterColon;
            }
            _ => return Err(self.fail(WriteError::UnexpectedToken)),
        }
        self.emit_ascii(":")
    }

    /// Write the comma separating two members or elements.
    pub fn write_comma(&mut self) -> Result<(), WriteError> {
        self.check()?;
        match self.stack.last_mut() {
            Some(top) if top.state == ContainerState::AfterValue => {
                top.state = ContainerState::AfterComma;
            }
            _ => return Err(self.fail(WriteError::UnexpectedToken)),
        }
        self.emit_ascii(",")
    }

    /// Write `count` space characters. Whitespace is legal everywhere and
    /// does not change the writer's state.
    pub fn write_space(&mut self, count: usize) -> Result<(), WriteError> {
        self.check()?;
        let out = self.options.output_encoding;
        self.scratch.clear();
        for _ in 0..count {
            out.encode_into(0x20, &mut self.scratch);
        }
        self.emit()
    }

    /// Write a line break: LF, or CRLF if the writer was configured to use
    /// it.
    pub fn write_newline(&mut self) -> Result<(), WriteError> {
        self.check()?;
        self.emit_ascii(if self.options.use_crlf { "\r\n" } else { "\n" })
    }

    fn write_keyword(&mut self, text: &str) -> Result<(), WriteError> {
        self.check()?;
        if !self.value_legal() {
            return Err(self.fail(WriteError::UnexpectedToken));
        }
        self.emit_ascii(text)?;
        self.end_value();
        Ok(())
    }

    fn write_open(&mut self, kind: ContainerKind, punct: u32) -> Result<(), WriteError> {
        self.check()?;
        if !self.value_legal() {
            return Err(self.fail(WriteError::UnexpectedToken));
        }
        self.stack.push(Container::new(kind));
        let out = self.options.output_encoding;
        self.scratch.clear();
        out.encode_into(punct, &mut self.scratch);
        self.emit()
    }

    fn write_close(&mut self, kind: ContainerKind, punct: u32) -> Result<(), WriteError> {
        self.check()?;
        match self.stack.last() {
            Some(top) if top.kind == kind && top.may_close() => {
                self.stack.pop();
            }
            _ => return Err(self.fail(WriteError::UnexpectedToken)),
        }
        let out = self.options.output_encoding;
        self.scratch.clear();
        out.encode_into(punct, &mut self.scratch);
        self.emit()?;
        self.end_value();
        Ok(())
    }

    /// `true` if a value may be written here.
    fn value_legal(&self) -> bool {
        match self.stack.last() {
            None => !self.document_done,
            Some(top) => top.expects_value(),
        }
    }

    fn end_value(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            top.state = ContainerState::AfterValue;
        } else {
            self.document_done = true;
        }
    }

    fn check(&self) -> Result<(), WriteError> {
        match self.failed {
            Some(kind) => Err(WriteError::from_kind(kind)),
            None => Ok(()),
        }
    }

    fn fail(&mut self, e: WriteError) -> WriteError {
        self.failed = Some(e.kind());
        e
    }

    fn emit_ascii(&mut self, text: &str) -> Result<(), WriteError> {
        let out = self.options.output_encoding;
        self.scratch.clear();
        for b in text.bytes() {
            out.encode_into(b as u32, &mut self.scratch);
        }
        self.emit()
    }

    fn emit(&mut self) -> Result<(), WriteError> {
        match self.sink.write_all(&self.scratch) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.failed = Some(ErrorKind::AbortedByHandler);
                Err(WriteError::Aborted(e))
            }
        }
    }
}

fn push_ascii(encoding: Encoding, out: &mut Vec<u8>, text: &str) {
    for b in text.bytes() {
        encoding.encode_into(b as u32, out);
    }
}

/// Append `\uXXXX` for one UTF-16 code unit, encoded in the output encoding.
fn push_escape_unit(encoding: Encoding, out: &mut Vec<u8>, unit: u16) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    push_ascii(encoding, out, "\\u");
    for shift in [12u16, 8, 4, 0] {
        encoding.encode_into(HEX[(unit >> shift & 0xF) as usize] as u32, out);
    }
}
