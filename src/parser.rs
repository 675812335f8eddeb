use std::collections::{HashSet, VecDeque};
use std::num::ParseFloatError;
use std::str::{from_utf8, Utf8Error};

use btoi::ParseIntegerError;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, FromPrimitive, Zero};
use thiserror::Error;

use crate::container::{Container, ContainerKind, ContainerState};
use crate::encoding::{detect_encoding, Decoder, Detection, Encoding, Step};
use crate::error::{ErrorKind, ParseError};
use crate::event::{JsonEvent, SpecialNumber};
use crate::feeder::JsonFeeder;
use crate::location::Location;
use crate::options::JsonParserOptions;
use crate::reset::Reset;
use crate::text::{NumberAttributes, StringAttributes, TextBuffer};

/// An error that can happen when reading the current value as a string
#[derive(Error, Debug)]
#[error("invalid string: {0}")]
pub struct InvalidStringValueError(#[from] Utf8Error);

/// An error that can happen when trying to parse the current value to an integer
#[derive(Error, Debug)]
#[error("invalid integer: {0}")]
pub struct InvalidIntValueError(#[from] ParseIntegerError);

/// An error that can happen when trying to parse the current value to a float
#[derive(Error, Debug)]
pub enum InvalidFloatValueError {
    #[error("unable to convert current value to string: {0}")]
    String(#[from] InvalidStringValueError),

    #[error("unable to parse current value to float: {0}")]
    Float(#[from] ParseFloatError),
}

/// The sub-states of the number scanner. `Zero`, `Int`, `Frac`, `Exp` and
/// `Hex` accept the end of the token; every other state requires more
/// characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NumberState {
    Minus,
    Zero,
    Int,
    Frac0,
    Frac,
    ExpMark,
    ExpSign,
    Exp,
    HexMark,
    Hex,
}

impl NumberState {
    fn accepts_end(self) -> bool {
        matches!(
            self,
            NumberState::Zero | NumberState::Int | NumberState::Frac | NumberState::Exp | NumberState::Hex
        )
    }
}

/// The lexer state. A partial token survives a chunk boundary in this state
/// and is resumed when the next chunk arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexState {
    /// Between tokens
    Idle,

    /// Inside a keyword literal; `pos` indexes the next expected byte of
    /// `text`
    Literal {
        text: &'static str,
        pos: usize,
        event: JsonEvent,
    },

    Number(NumberState),

    /// Inside a string, between escapes
    StringBody { is_name: bool },

    /// A backslash has been consumed
    StringEscape { is_name: bool },

    /// Inside a `\uXXXX` escape; `remaining` hex digits are outstanding
    StringUnicode {
        is_name: bool,
        remaining: u8,
        value: u32,
    },

    /// A `/` has been consumed and comments are enabled
    SlashSeen,

    LineComment,
    BlockComment,
    BlockCommentStar,
}

/// A member name that has been reported to the caller but not yet committed
/// to the enclosing object's name set.
#[derive(Debug)]
struct PendingMember {
    /// The name in the configured string encoding; only kept when member
    /// tracking is enabled
    name: Option<Vec<u8>>,
    location: Location,
    /// Set by [`JsonParser::treat_member_as_duplicate()`]
    duplicate: bool,
}

enum Finish {
    Eof,
    Continue,
}

/// An incremental, event-based JSON parser.
///
/// The parser pulls bytes from its [`JsonFeeder`], decodes them in the
/// detected (or configured) input encoding, and turns them into a stream of
/// [`JsonEvent`]s. All state is kept in the parser instance, so parsing can
/// be suspended and resumed at any byte boundary: feeding a document in one
/// chunk or byte by byte produces exactly the same events and the same final
/// result.
pub struct JsonParser<T> {
    pub feeder: T,

    options: JsonParserOptions,

    /// The committed input encoding
    encoding: Option<Encoding>,
    decoder: Decoder,

    /// The first bytes of the stream, buffered for encoding detection and
    /// replayed through the decoder once the encoding is known
    detect_buf: [u8; 4],
    detect_len: u8,
    replay: u8,
    detected: bool,

    /// Raw bytes consumed so far
    byte_offset: usize,
    line: usize,
    column: usize,
    prev_was_cr: bool,
    /// `true` until the first codepoint has been seen (the BOM window)
    at_start: bool,

    lex: LexState,
    buffer: TextBuffer,
    number_attributes: NumberAttributes,
    special: Option<SpecialNumber>,
    token_start: Location,

    /// A `\uD8xx` escape waiting for its low partner, with the location of
    /// its backslash
    high_surrogate: Option<u32>,
    high_surrogate_start: Location,
    /// The backslash position of the escape currently being scanned
    escape_start: Location,

    stack: Vec<Container>,
    /// `true` once the top-level value is complete
    top_value_done: bool,
    stopped: bool,
    stop_reported: bool,

    /// One name set per open object, innermost last; empty unless member
    /// tracking is enabled
    member_sets: Vec<HashSet<Vec<u8>>>,
    pending_member: Option<PendingMember>,

    events: VecDeque<(JsonEvent, Location, Location)>,
    current_locations: Option<(Location, Location)>,

    error: Option<ParseError>,
}

impl<T> JsonParser<T>
where
    T: JsonFeeder,
{
    /// Create a new JSON parser using the given [`JsonFeeder`]
    pub fn new(feeder: T) -> Self {
        Self::new_with_options(feeder, JsonParserOptions::default())
    }

    /// Create a new JSON parser using the given [`JsonFeeder`] and
    /// [`JsonParserOptions`]
    pub fn new_with_options(feeder: T, options: JsonParserOptions) -> Self {
        let encoding = options.input_encoding;
        JsonParser {
            feeder,
            options,
            encoding,
            decoder: Decoder::new(encoding.unwrap_or_default()),
            detect_buf: [0; 4],
            detect_len: 0,
            replay: 0,
            detected: encoding.is_some(),
            byte_offset: 0,
            line: 0,
            column: 0,
            prev_was_cr: false,
            at_start: true,
            lex: LexState::Idle,
            buffer: TextBuffer::default(),
            number_attributes: NumberAttributes::empty(),
            special: None,
            token_start: Location::default(),
            high_surrogate: None,
            high_surrogate_start: Location::default(),
            escape_start: Location::default(),
            stack: vec![],
            top_value_done: false,
            stopped: false,
            stop_reported: false,
            member_sets: vec![],
            pending_member: None,
            events: VecDeque::new(),
            current_locations: None,
            error: None,
        }
    }

    /// Return the parser to its just-created state, keeping the feeder and
    /// the options.
    pub fn reset(&mut self) {
        self.encoding = self.options.input_encoding;
        self.decoder = Decoder::new(self.encoding.unwrap_or_default());
        self.detect_len = 0;
        self.replay = 0;
        self.detected = self.encoding.is_some();
        self.byte_offset = 0;
        self.line = 0;
        self.column = 0;
        self.prev_was_cr = false;
        self.at_start = true;
        self.lex = LexState::Idle;
        self.buffer.clear();
        self.number_attributes = NumberAttributes::empty();
        self.special = None;
        self.token_start = Location::default();
        self.high_surrogate = None;
        self.stack.clear();
        self.top_value_done = false;
        self.stopped = false;
        self.stop_reported = false;
        self.member_sets.clear();
        self.pending_member = None;
        self.events.clear();
        self.current_locations = None;
        self.error = None;
    }

    /// Call this method to proceed parsing the JSON text and to get the next
    /// event. The method returns
    /// [`Some(JsonEvent::NeedMoreInput)`](JsonEvent::NeedMoreInput) if it
    /// needs more input data from the feeder and `Ok(None)` when the end of
    /// the JSON text has been reached. After an error, every further call
    /// returns the same [`ParseError`] until the parser is reset.
    pub fn next_event(&mut self) -> Result<Option<JsonEvent>, ParseError> {
        if let Some(event) = self.pop_event() {
            return Ok(Some(event));
        }
        if let Some(e) = self.error {
            return Err(e);
        }
        match self.advance() {
            Ok(r) => Ok(r),
            Err(e) => {
                self.error = Some(e);
                // events produced before the error are still delivered in
                // order; the error surfaces once the queue is drained
                if let Some(event) = self.pop_event() {
                    return Ok(Some(event));
                }
                Err(e)
            }
        }
    }

    fn pop_event(&mut self) -> Option<JsonEvent> {
        let (event, start, after) = self.events.pop_front()?;
        self.current_locations = Some((start, after));
        Some(event)
    }

    fn advance(&mut self) -> Result<Option<JsonEvent>, ParseError> {
        loop {
            if let Some(event) = self.pop_event() {
                return Ok(Some(event));
            }

            self.resolve_pending_member()?;

            if self.stopped {
                if !self.stop_reported {
                    self.stop_reported = true;
                    return Ok(None);
                }
                return Err(ParseError::new(
                    ErrorKind::StoppedAfterEmbeddedDocument,
                    self.here(),
                ));
            }

            if !self.detected {
                if self.detect_step()? {
                    continue;
                }
                return Ok(Some(JsonEvent::NeedMoreInput));
            }

            if (self.replay as usize) < self.detect_len as usize {
                let b = self.detect_buf[self.replay as usize];
                self.replay += 1;
                self.consume_byte(b)?;
                continue;
            }

            match self.feeder.next_input() {
                Some(b) => self.consume_byte(b)?,
                None => {
                    if !self.feeder.is_done() {
                        return Ok(Some(JsonEvent::NeedMoreInput));
                    }
                    match self.finish()? {
                        Finish::Eof => return Ok(None),
                        Finish::Continue => {}
                    }
                }
            }
        }
    }

    /// Buffer up to four bytes and classify the input encoding. Returns
    /// `true` once the encoding has been committed.
    fn detect_step(&mut self) -> Result<bool, ParseError> {
        while self.detect_len < 4 {
            match self.feeder.next_input() {
                Some(b) => {
                    self.detect_buf[self.detect_len as usize] = b;
                    self.detect_len += 1;
                }
                None => break,
            }
        }
        if self.detect_len < 4 && !self.feeder.is_done() {
            return Ok(false);
        }
        if self.detect_len == 0 {
            return Err(ParseError::new(ErrorKind::ExpectedMoreTokens, self.here()));
        }
        match detect_encoding(&self.detect_buf[..self.detect_len as usize], true) {
            Detection::Detected(encoding) => {
                self.encoding = Some(encoding);
                self.decoder = Decoder::new(encoding);
                self.detected = true;
                let loc = self.here();
                self.events.push_back((JsonEvent::EncodingDetected, loc, loc));
                Ok(true)
            }
            Detection::Invalid => Err(ParseError::new(
                ErrorKind::InvalidEncodingSequence,
                self.here(),
            )),
            Detection::NeedMoreInput => Ok(false),
        }
    }

    /// The current position, one byte past everything consumed so far.
    fn here(&self) -> Location {
        Location::new(self.byte_offset, self.line, self.column, self.stack.len())
    }

    fn pos_after(loc: Location, len: usize) -> Location {
        Location::new(loc.byte + len, loc.line, loc.column + 1, loc.depth)
    }

    fn string_encoding(&self) -> Encoding {
        self.options.string_encoding
    }

    fn consume_byte(&mut self, b: u8) -> Result<(), ParseError> {
        self.byte_offset += 1;
        match self.decoder.push(b) {
            Step::Pending => Ok(()),
            Step::Scalar { cp, len } => self.handle_scalar(cp, len as usize),
            Step::Invalid { len } => self.handle_invalid(len as usize, 0),
            Step::InvalidPending { len } => {
                let trailing = self.decoder.pending_len();
                self.handle_invalid(len as usize, trailing)
            }
            Step::InvalidScalar { len, cp, cp_len } => {
                self.handle_invalid(len as usize, cp_len as usize)?;
                self.handle_scalar(cp, cp_len as usize)
            }
            Step::InvalidTwice { len } => {
                self.handle_invalid(len as usize, 1)?;
                self.handle_invalid(1, 0)
            }
        }
    }

    fn handle_scalar(&mut self, cp: u32, len: usize) -> Result<(), ParseError> {
        let loc = Location::new(
            self.byte_offset - len,
            self.line,
            self.column,
            self.stack.len(),
        );
        self.process_codepoint(cp, len, loc, false)
    }

    /// Handle a maximal invalid sequence of `len` bytes ending `trailing`
    /// bytes before the current read position.
    fn handle_invalid(&mut self, len: usize, trailing: usize) -> Result<(), ParseError> {
        let loc = Location::new(
            self.byte_offset - trailing - len,
            self.line,
            self.column,
            self.stack.len(),
        );
        if self.options.replace_invalid_encoding_sequences {
            self.process_codepoint(0xFFFD, len, loc, true)
        } else {
            Err(ParseError::new(ErrorKind::InvalidEncodingSequence, loc))
        }
    }

    fn process_codepoint(
        &mut self,
        cp: u32,
        len: usize,
        loc: Location,
        replaced: bool,
    ) -> Result<(), ParseError> {
        if self.at_start {
            self.at_start = false;
            if cp == 0xFEFF && !replaced {
                return if self.options.allow_bom {
                    // the BOM is consumed; it occupies bytes but no column
                    Ok(())
                } else {
                    Err(ParseError::new(ErrorKind::BomNotAllowed, loc))
                };
            }
        }
        self.dispatch(cp, len, loc, replaced)?;
        self.advance_position(cp);
        Ok(())
    }

    fn advance_position(&mut self, cp: u32) {
        match cp {
            0x0A => {
                // the LF of a CRLF pair does not break the line again
                if self.prev_was_cr {
                    self.prev_was_cr = false;
                } else {
                    self.line += 1;
                    self.column = 0;
                }
            }
            0x0D => {
                self.line += 1;
                self.column = 0;
                self.prev_was_cr = true;
            }
            _ => {
                self.column += 1;
                self.prev_was_cr = false;
            }
        }
    }

    /// Feed one codepoint to the lexer, re-dispatching when a token is
    /// terminated by the first character of the next one.
    fn dispatch(
        &mut self,
        cp: u32,
        len: usize,
        loc: Location,
        replaced: bool,
    ) -> Result<(), ParseError> {
        loop {
            let again = match self.lex {
                LexState::Idle => self.lex_idle(cp, len, loc)?,
                LexState::Literal { text, pos, event } => {
                    self.lex_literal(text, pos, event, cp, len, loc)?
                }
                LexState::Number(state) => self.lex_number(state, cp, loc)?,
                LexState::StringBody { is_name } => {
                    self.lex_string_body(is_name, cp, len, loc, replaced)?
                }
                LexState::StringEscape { is_name } => self.lex_string_escape(is_name, cp)?,
                LexState::StringUnicode {
                    is_name,
                    remaining,
                    value,
                } => self.lex_string_unicode(is_name, remaining, value, cp)?,
                LexState::SlashSeen => match ascii(cp) {
                    Some(b'/') => {
                        self.lex = LexState::LineComment;
                        false
                    }
                    Some(b'*') => {
                        self.lex = LexState::BlockComment;
                        false
                    }
                    _ => return Err(ParseError::new(ErrorKind::UnknownToken, self.token_start)),
                },
                LexState::LineComment => {
                    if cp == 0x0A || cp == 0x0D {
                        self.lex = LexState::Idle;
                    }
                    false
                }
                LexState::BlockComment => {
                    if ascii(cp) == Some(b'*') {
                        self.lex = LexState::BlockCommentStar;
                    }
                    false
                }
                LexState::BlockCommentStar => {
                    self.lex = match ascii(cp) {
                        Some(b'/') => LexState::Idle,
                        Some(b'*') => LexState::BlockCommentStar,
                        _ => LexState::BlockComment,
                    };
                    false
                }
            };
            if !again {
                return Ok(());
            }
            // in embedded-document mode the codepoint that terminated the
            // top-level value belongs to the remainder of the stream
            if self.stopped {
                return Ok(());
            }
        }
    }

    fn lex_idle(&mut self, cp: u32, len: usize, loc: Location) -> Result<bool, ParseError> {
        match ascii(cp) {
            Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => Ok(false),
            Some(b'"') => {
                let is_name = self.stack.last().is_some_and(Container::expects_name);
                if !is_name {
                    self.begin_value(loc)?;
                }
                self.token_start = loc;
                self.buffer.clear();
                self.high_surrogate = None;
                self.lex = LexState::StringBody { is_name };
                Ok(false)
            }
            Some(b'{') => {
                self.begin_value(loc)?;
                self.stack.push(Container::new(ContainerKind::Object));
                if self.options.track_object_members {
                    self.member_sets.push(HashSet::new());
                }
                let after = Self::pos_after(loc, len);
                self.events.push_back((JsonEvent::StartObject, loc, after));
                Ok(false)
            }
            Some(b'[') => {
                self.begin_value(loc)?;
                self.stack.push(Container::new(ContainerKind::Array));
                let after = Self::pos_after(loc, len);
                self.events.push_back((JsonEvent::StartArray, loc, after));
                Ok(false)
            }
            Some(b'}') => self.close_container(ContainerKind::Object, loc, len),
            Some(b']') => self.close_container(ContainerKind::Array, loc, len),
            Some(b',') => match self.stack.last_mut() {
                Some(top) if top.state == ContainerState::AfterValue => {
                    top.state = ContainerState::AfterComma;
                    Ok(false)
                }
                _ => Err(ParseError::new(ErrorKind::UnexpectedToken, loc)),
            },
            Some(b':') => match self.stack.last_mut() {
                Some(top)
                    if top.kind == ContainerKind::Object
                        && top.state == ContainerState::AfterName =>
                {
                    top.state = ContainerState::AfterColon;
                    Ok(false)
                }
                _ => Err(ParseError::new(ErrorKind::UnexpectedToken, loc)),
            },
            Some(b'-') => {
                self.begin_number(loc)?;
                self.number_attributes |= NumberAttributes::IS_NEGATIVE;
                self.append_number_cp(cp)?;
                self.lex = LexState::Number(NumberState::Minus);
                Ok(false)
            }
            Some(b'0') => {
                self.begin_number(loc)?;
                self.append_number_cp(cp)?;
                self.lex = LexState::Number(NumberState::Zero);
                Ok(false)
            }
            Some(b'1'..=b'9') => {
                self.begin_number(loc)?;
                self.append_number_cp(cp)?;
                self.lex = LexState::Number(NumberState::Int);
                Ok(false)
            }
            Some(b'n') => self.begin_literal("null", JsonEvent::ValueNull, None, loc),
            Some(b't') => self.begin_literal("true", JsonEvent::ValueTrue, None, loc),
            Some(b'f') => self.begin_literal("false", JsonEvent::ValueFalse, None, loc),
            Some(b'N') if self.options.allow_special_numbers => self.begin_literal(
                "NaN",
                JsonEvent::ValueSpecialNumber,
                Some(SpecialNumber::NaN),
                loc,
            ),
            Some(b'I') if self.options.allow_special_numbers => self.begin_literal(
                "Infinity",
                JsonEvent::ValueSpecialNumber,
                Some(SpecialNumber::Infinity),
                loc,
            ),
            Some(b'/') if self.options.allow_comments => {
                self.token_start = loc;
                self.lex = LexState::SlashSeen;
                Ok(false)
            }
            _ => Err(ParseError::new(ErrorKind::UnknownToken, loc)),
        }
    }

    /// Check that a value may begin at `loc` and emit
    /// [`JsonEvent::ArrayItem`] if the value is an array element.
    fn begin_value(&mut self, loc: Location) -> Result<(), ParseError> {
        match self.stack.last() {
            None => {
                if self.top_value_done {
                    Err(ParseError::new(ErrorKind::UnexpectedToken, loc))
                } else {
                    Ok(())
                }
            }
            Some(top) if top.expects_value() => {
                if top.kind == ContainerKind::Array {
                    self.events.push_back((JsonEvent::ArrayItem, loc, loc));
                }
                Ok(())
            }
            Some(_) => Err(ParseError::new(ErrorKind::UnexpectedToken, loc)),
        }
    }

    fn begin_number(&mut self, loc: Location) -> Result<(), ParseError> {
        self.begin_value(loc)?;
        self.token_start = loc;
        self.buffer.clear();
        self.number_attributes = NumberAttributes::empty();
        self.special = None;
        Ok(())
    }

    fn begin_literal(
        &mut self,
        text: &'static str,
        event: JsonEvent,
        special: Option<SpecialNumber>,
        loc: Location,
    ) -> Result<bool, ParseError> {
        self.begin_value(loc)?;
        self.token_start = loc;
        self.special = special;
        if special.is_some() {
            self.buffer.clear();
            self.number_attributes = NumberAttributes::empty();
            self.append_number_cp(text.as_bytes()[0] as u32)?;
        }
        self.lex = LexState::Literal {
            text,
            pos: 1,
            event,
        };
        Ok(false)
    }

    fn lex_literal(
        &mut self,
        text: &'static str,
        pos: usize,
        event: JsonEvent,
        cp: u32,
        len: usize,
        loc: Location,
    ) -> Result<bool, ParseError> {
        if cp != text.as_bytes()[pos] as u32 {
            return Err(ParseError::new(ErrorKind::UnknownToken, self.token_start));
        }
        if self.special.is_some() {
            self.append_number_cp(cp)?;
        }
        if pos + 1 == text.len() {
            self.lex = LexState::Idle;
            let after = Self::pos_after(loc, len);
            self.finish_value(event, after);
        } else {
            self.lex = LexState::Literal {
                text,
                pos: pos + 1,
                event,
            };
        }
        Ok(false)
    }

    fn lex_number(
        &mut self,
        state: NumberState,
        cp: u32,
        loc: Location,
    ) -> Result<bool, ParseError> {
        use NumberState::*;

        let invalid = |p: &Self| ParseError::new(ErrorKind::InvalidNumber, p.token_start);
        let c = ascii(cp);
        let next = match state {
            Minus => match c {
                Some(b'0') => Some(Zero),
                Some(b'1'..=b'9') => Some(Int),
                Some(b'I') if self.options.allow_special_numbers => {
                    self.special = Some(SpecialNumber::NegInfinity);
                    self.append_number_cp(cp)?;
                    self.lex = LexState::Literal {
                        text: "-Infinity",
                        pos: 2,
                        event: JsonEvent::ValueSpecialNumber,
                    };
                    return Ok(false);
                }
                _ => return Err(invalid(self)),
            },
            Zero => match c {
                Some(b'.') => {
                    self.number_attributes |= NumberAttributes::CONTAINS_DECIMAL_POINT;
                    Some(Frac0)
                }
                Some(b'e') | Some(b'E') => {
                    self.number_attributes |= NumberAttributes::CONTAINS_EXPONENT;
                    Some(ExpMark)
                }
                Some(b'x') | Some(b'X')
                    if self.options.allow_hex_numbers
                        && !self
                            .number_attributes
                            .contains(NumberAttributes::IS_NEGATIVE) =>
                {
                    self.number_attributes |= NumberAttributes::IS_HEX;
                    Some(HexMark)
                }
                // a leading zero must not be followed by more digits
                Some(b'0'..=b'9') => return Err(invalid(self)),
                _ => None,
            },
            Int => match c {
                Some(b'0'..=b'9') => Some(Int),
                Some(b'.') => {
                    self.number_attributes |= NumberAttributes::CONTAINS_DECIMAL_POINT;
                    Some(Frac0)
                }
                Some(b'e') | Some(b'E') => {
                    self.number_attributes |= NumberAttributes::CONTAINS_EXPONENT;
                    Some(ExpMark)
                }
                _ => None,
            },
            Frac0 => match c {
                Some(b'0'..=b'9') => Some(Frac),
                _ => return Err(invalid(self)),
            },
            Frac => match c {
                Some(b'0'..=b'9') => Some(Frac),
                Some(b'e') | Some(b'E') => {
                    self.number_attributes |= NumberAttributes::CONTAINS_EXPONENT;
                    Some(ExpMark)
                }
                _ => None,
            },
            ExpMark => match c {
                Some(b'0'..=b'9') => Some(Exp),
                Some(b'+') => Some(ExpSign),
                Some(b'-') => {
                    self.number_attributes |= NumberAttributes::CONTAINS_NEGATIVE_EXPONENT;
                    Some(ExpSign)
                }
                _ => return Err(invalid(self)),
            },
            ExpSign => match c {
                Some(b'0'..=b'9') => Some(Exp),
                _ => return Err(invalid(self)),
            },
            Exp => match c {
                Some(b'0'..=b'9') => Some(Exp),
                _ => None,
            },
            HexMark => match c {
                Some(b) if b.is_ascii_hexdigit() => Some(Hex),
                _ => return Err(invalid(self)),
            },
            Hex => match c {
                Some(b) if b.is_ascii_hexdigit() => Some(Hex),
                _ => None,
            },
        };

        match next {
            Some(next) => {
                self.append_number_cp(cp)?;
                self.lex = LexState::Number(next);
                Ok(false)
            }
            None => {
                // the current codepoint belongs to whatever follows the number
                self.lex = LexState::Idle;
                self.finish_value(JsonEvent::ValueNumber, loc);
                Ok(true)
            }
        }
    }

    fn lex_string_body(
        &mut self,
        is_name: bool,
        cp: u32,
        len: usize,
        loc: Location,
        replaced: bool,
    ) -> Result<bool, ParseError> {
        if self.high_surrogate.is_some() && ascii(cp) != Some(b'\\') {
            return Err(ParseError::new(
                ErrorKind::UnpairedSurrogateEscapeSequence,
                self.high_surrogate_start,
            ));
        }
        match ascii(cp) {
            Some(b'"') if !replaced => {
                self.lex = LexState::Idle;
                let after = Self::pos_after(loc, len);
                if is_name {
                    self.finish_name(after);
                } else {
                    self.finish_value(JsonEvent::ValueString, after);
                }
                Ok(false)
            }
            Some(b'\\') if !replaced => {
                self.escape_start = loc;
                self.lex = LexState::StringEscape { is_name };
                Ok(false)
            }
            _ if cp < 0x20 => {
                if self.options.allow_unescaped_control_characters {
                    self.append_string_cp(cp, replaced)?;
                    Ok(false)
                } else {
                    Err(ParseError::new(ErrorKind::UnescapedControlCharacter, loc))
                }
            }
            _ => {
                self.append_string_cp(cp, replaced)?;
                Ok(false)
            }
        }
    }

    fn lex_string_escape(&mut self, is_name: bool, cp: u32) -> Result<bool, ParseError> {
        if self.high_surrogate.is_some() && ascii(cp) != Some(b'u') {
            return Err(ParseError::new(
                ErrorKind::UnpairedSurrogateEscapeSequence,
                self.high_surrogate_start,
            ));
        }
        let simple = match ascii(cp) {
            Some(b'"') => Some(0x22),
            Some(b'\\') => Some(0x5C),
            Some(b'/') => Some(0x2F),
            Some(b'b') => Some(0x08),
            Some(b'f') => Some(0x0C),
            Some(b'n') => Some(0x0A),
            Some(b'r') => Some(0x0D),
            Some(b't') => Some(0x09),
            Some(b'u') => {
                self.lex = LexState::StringUnicode {
                    is_name,
                    remaining: 4,
                    value: 0,
                };
                return Ok(false);
            }
            _ => None,
        };
        match simple {
            Some(cp) => {
                self.append_string_cp(cp, false)?;
                self.lex = LexState::StringBody { is_name };
                Ok(false)
            }
            None => Err(ParseError::new(
                ErrorKind::InvalidEscapeSequence,
                self.escape_start,
            )),
        }
    }

    fn lex_string_unicode(
        &mut self,
        is_name: bool,
        remaining: u8,
        value: u32,
        cp: u32,
    ) -> Result<bool, ParseError> {
        let digit = match ascii(cp) {
            Some(b @ b'0'..=b'9') => (b - b'0') as u32,
            Some(b @ b'a'..=b'f') => (b - b'a') as u32 + 10,
            Some(b @ b'A'..=b'F') => (b - b'A') as u32 + 10,
            _ => {
                return Err(ParseError::new(
                    ErrorKind::InvalidEscapeSequence,
                    self.escape_start,
                ))
            }
        };
        let value = value << 4 | digit;
        if remaining > 1 {
            self.lex = LexState::StringUnicode {
                is_name,
                remaining: remaining - 1,
                value,
            };
            return Ok(false);
        }

        self.lex = LexState::StringBody { is_name };
        if let Some(high) = self.high_surrogate.take() {
            if (0xDC00..=0xDFFF).contains(&value) {
                let cp = 0x10000 + (((high - 0xD800) << 10) | (value - 0xDC00));
                self.append_string_cp(cp, false)?;
                Ok(false)
            } else {
                Err(ParseError::new(
                    ErrorKind::UnpairedSurrogateEscapeSequence,
                    self.high_surrogate_start,
                ))
            }
        } else if (0xD800..=0xDBFF).contains(&value) {
            self.high_surrogate = Some(value);
            self.high_surrogate_start = self.escape_start;
            Ok(false)
        } else if (0xDC00..=0xDFFF).contains(&value) {
            Err(ParseError::new(
                ErrorKind::UnpairedSurrogateEscapeSequence,
                self.escape_start,
            ))
        } else {
            self.append_string_cp(value, false)?;
            Ok(false)
        }
    }

    fn append_string_cp(&mut self, cp: u32, replaced: bool) -> Result<(), ParseError> {
        let encoding = self.string_encoding();
        if replaced {
            self.buffer.append_replacement(encoding);
        } else {
            self.buffer.append_scalar(cp, encoding);
        }
        if self.buffer.len() > self.options.max_string_length {
            return Err(ParseError::new(ErrorKind::TooLongString, self.token_start));
        }
        Ok(())
    }

    fn append_number_cp(&mut self, cp: u32) -> Result<(), ParseError> {
        self.buffer.append_scalar(cp, self.options.number_encoding);
        if self.buffer.len() > self.options.max_number_length {
            return Err(ParseError::new(ErrorKind::TooLongNumber, self.token_start));
        }
        Ok(())
    }

    fn close_container(
        &mut self,
        kind: ContainerKind,
        loc: Location,
        len: usize,
    ) -> Result<bool, ParseError> {
        match self.stack.last() {
            Some(top) if top.kind == kind && top.may_close() => {
                self.stack.pop();
                if kind == ContainerKind::Object && self.options.track_object_members {
                    self.member_sets.pop();
                }
                let event = match kind {
                    ContainerKind::Object => JsonEvent::EndObject,
                    ContainerKind::Array => JsonEvent::EndArray,
                };
                let after = Self::pos_after(loc, len);
                self.events.push_back((event, loc, after));
                self.complete_value();
                Ok(false)
            }
            _ => Err(ParseError::new(ErrorKind::UnexpectedToken, loc)),
        }
    }

    /// Queue a value event and move the grammar past the value.
    fn finish_value(&mut self, event: JsonEvent, after: Location) {
        self.events.push_back((event, self.token_start, after));
        self.complete_value();
    }

    fn complete_value(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            top.state = ContainerState::AfterValue;
        } else {
            self.top_value_done = true;
            if self.options.stop_after_embedded_document {
                self.stopped = true;
            }
        }
    }

    fn finish_name(&mut self, after: Location) {
        if let Some(top) = self.stack.last_mut() {
            top.state = ContainerState::AfterName;
        }
        let name = if self.options.track_object_members {
            Some(self.buffer.bytes().to_vec())
        } else {
            None
        };
        self.pending_member = Some(PendingMember {
            name,
            location: self.token_start,
            duplicate: false,
        });
        self.events
            .push_back((JsonEvent::FieldName, self.token_start, after));
    }

    /// Commit the most recently reported member name to the enclosing
    /// object's name set, failing if it repeats or the caller flagged it.
    fn resolve_pending_member(&mut self) -> Result<(), ParseError> {
        if let Some(pending) = self.pending_member.take() {
            if pending.duplicate {
                return Err(ParseError::new(
                    ErrorKind::DuplicateObjectMember,
                    pending.location,
                ));
            }
            if let Some(name) = pending.name {
                if let Some(set) = self.member_sets.last_mut() {
                    if !set.insert(name) {
                        return Err(ParseError::new(
                            ErrorKind::DuplicateObjectMember,
                            pending.location,
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Flush pending state at the end of the input.
    fn finish(&mut self) -> Result<Finish, ParseError> {
        if let Some((first, second)) = self.decoder.flush() {
            let total = first as usize + second as usize;
            if !self.options.replace_invalid_encoding_sequences {
                let loc = Location::new(
                    self.byte_offset - total,
                    self.line,
                    self.column,
                    self.stack.len(),
                );
                return Err(ParseError::new(ErrorKind::InvalidEncodingSequence, loc));
            }
            self.handle_invalid(first as usize, second as usize)?;
            if second > 0 {
                self.handle_invalid(second as usize, 0)?;
            }
            return Ok(Finish::Continue);
        }

        match self.lex {
            LexState::Idle => {}
            // a line comment is terminated by the end of the input
            LexState::LineComment => self.lex = LexState::Idle,
            LexState::Number(state) if state.accepts_end() => {
                self.lex = LexState::Idle;
                let after = self.here();
                self.finish_value(JsonEvent::ValueNumber, after);
                return Ok(Finish::Continue);
            }
            _ => {
                return Err(ParseError::new(ErrorKind::IncompleteToken, self.token_start));
            }
        }

        if !self.stack.is_empty() || !self.top_value_done {
            return Err(ParseError::new(ErrorKind::ExpectedMoreTokens, self.here()));
        }
        Ok(Finish::Eof)
    }

    /// Force the member name most recently reported through
    /// [`JsonEvent::FieldName`] to be treated as a duplicate, regardless of
    /// the tracked name set. The next call to [`next_event()`](Self::next_event())
    /// then fails with
    /// [`DuplicateObjectMember`](ErrorKind::DuplicateObjectMember). Returns
    /// `false` if there is no member name to flag.
    pub fn treat_member_as_duplicate(&mut self) -> bool {
        match self.pending_member.as_mut() {
            Some(pending) => {
                pending.duplicate = true;
                true
            }
            None => false,
        }
    }

    /// Get the text of the token that has just been reported, in the
    /// configured string or number encoding. Call this function after you've
    /// received [`JsonEvent::FieldName`], [`JsonEvent::ValueString`],
    /// [`JsonEvent::ValueNumber`] or [`JsonEvent::ValueSpecialNumber`].
    pub fn current_bytes(&self) -> &[u8] {
        self.buffer.bytes()
    }

    /// Get the value of the string that has just been parsed as UTF-8 text.
    /// Only meaningful if the configured string encoding is UTF-8.
    pub fn current_str(&self) -> Result<&str, InvalidStringValueError> {
        Ok(from_utf8(self.buffer.bytes())?)
    }

    /// The attributes of the string that has just been parsed.
    pub fn string_attributes(&self) -> StringAttributes {
        self.buffer.attributes()
    }

    /// The attributes of the number that has just been parsed.
    pub fn number_attributes(&self) -> NumberAttributes {
        self.number_attributes
    }

    /// The special number that has just been parsed. Only meaningful after
    /// [`JsonEvent::ValueSpecialNumber`].
    pub fn current_special_number(&self) -> Option<SpecialNumber> {
        self.special
    }

    /// Get the value of the number that has just been parsed as an integer.
    /// Requires the number encoding to be UTF-8.
    pub fn current_int<I>(&self) -> Result<I, InvalidIntValueError>
    where
        I: FromPrimitive + Zero + CheckedAdd + CheckedSub + CheckedMul,
    {
        Ok(btoi::btoi(self.buffer.bytes())?)
    }

    /// Get the value of the number that has just been parsed as a float.
    /// Requires the number encoding to be UTF-8.
    pub fn current_float(&self) -> Result<f64, InvalidFloatValueError> {
        Ok(self.current_str()?.parse()?)
    }

    /// Return the number of bytes consumed so far. After the parser stopped
    /// at the end of an embedded document this is the offset at which the
    /// remainder of the stream begins.
    pub fn parsed_bytes(&self) -> usize {
        self.byte_offset
    }

    /// The input encoding, once it is known.
    pub fn input_encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    /// The location of the most recently reported token. `None` before the
    /// first event; otherwise valid until the next call to
    /// [`next_event()`](Self::next_event()).
    pub fn token_location(&self) -> Option<Location> {
        self.current_locations.map(|(start, _)| start)
    }

    /// The location one byte past the most recently reported token.
    pub fn after_token_location(&self) -> Option<Location> {
        self.current_locations.map(|(_, after)| after)
    }

    /// The frozen error, if parsing has failed.
    pub fn error(&self) -> Option<ParseError> {
        self.error
    }

    /// The options this parser was created with.
    pub fn options(&self) -> &JsonParserOptions {
        &self.options
    }
}

impl<T> Reset for JsonParser<T>
where
    T: JsonFeeder + Reset,
{
    /// Reset the parser and its feeder to the state they were in when they
    /// were constructed
    fn reset(&mut self) {
        self.feeder.reset();
        JsonParser::reset(self);
    }
}

/// The byte value of `cp` if it is ASCII.
fn ascii(cp: u32) -> Option<u8> {
    if cp < 0x80 {
        Some(cp as u8)
    } else {
        None
    }
}
