use crate::encoding::Encoding;

/// Options for [`JsonParser`](crate::JsonParser). Use
/// [`JsonParserOptionsBuilder`] to create instances of this struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonParserOptions {
    pub(crate) input_encoding: Option<Encoding>,
    pub(crate) string_encoding: Encoding,
    pub(crate) number_encoding: Encoding,
    pub(crate) max_string_length: usize,
    pub(crate) max_number_length: usize,
    pub(crate) allow_bom: bool,
    pub(crate) allow_comments: bool,
    pub(crate) allow_special_numbers: bool,
    pub(crate) allow_hex_numbers: bool,
    pub(crate) allow_unescaped_control_characters: bool,
    pub(crate) replace_invalid_encoding_sequences: bool,
    pub(crate) track_object_members: bool,
    pub(crate) stop_after_embedded_document: bool,
}

impl Default for JsonParserOptions {
    /// Returns default JSON parser options: auto-detected input encoding,
    /// UTF-8 string and number output, no length limits, BOM allowed, and
    /// every non-standard extension disabled.
    fn default() -> Self {
        Self {
            input_encoding: None,
            string_encoding: Encoding::Utf8,
            number_encoding: Encoding::Utf8,
            max_string_length: usize::MAX,
            max_number_length: usize::MAX,
            allow_bom: true,
            allow_comments: false,
            allow_special_numbers: false,
            allow_hex_numbers: false,
            allow_unescaped_control_characters: false,
            replace_invalid_encoding_sequences: false,
            track_object_members: false,
            stop_after_embedded_document: false,
        }
    }
}

impl JsonParserOptions {
    /// The fixed input encoding, or `None` if the parser detects it from the
    /// first bytes of the input.
    pub fn input_encoding(&self) -> Option<Encoding> {
        self.input_encoding
    }

    /// The encoding in which string tokens are handed to the caller.
    pub fn string_encoding(&self) -> Encoding {
        self.string_encoding
    }

    /// The encoding in which number tokens are handed to the caller.
    pub fn number_encoding(&self) -> Encoding {
        self.number_encoding
    }

    /// The maximum length, in encoded bytes, of a single string token.
    pub fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    /// The maximum length, in encoded bytes, of a single number token.
    pub fn max_number_length(&self) -> usize {
        self.max_number_length
    }

    /// Returns `true` if a leading byte-order mark is accepted.
    pub fn allow_bom(&self) -> bool {
        self.allow_bom
    }

    /// Returns `true` if `//` and `/* */` comments are accepted.
    pub fn allow_comments(&self) -> bool {
        self.allow_comments
    }

    /// Returns `true` if `NaN`, `Infinity` and `-Infinity` are accepted.
    pub fn allow_special_numbers(&self) -> bool {
        self.allow_special_numbers
    }

    /// Returns `true` if hexadecimal numbers (`0x1F`) are accepted.
    pub fn allow_hex_numbers(&self) -> bool {
        self.allow_hex_numbers
    }

    /// Returns `true` if strings may contain unescaped control characters.
    pub fn allow_unescaped_control_characters(&self) -> bool {
        self.allow_unescaped_control_characters
    }

    /// Returns `true` if invalid input sequences are replaced by U+FFFD
    /// instead of failing the parse.
    pub fn replace_invalid_encoding_sequences(&self) -> bool {
        self.replace_invalid_encoding_sequences
    }

    /// Returns `true` if object member names are tracked and duplicates
    /// rejected.
    pub fn track_object_members(&self) -> bool {
        self.track_object_members
    }

    /// Returns `true` if the parser stops cleanly after the first top-level
    /// value.
    pub fn stop_after_embedded_document(&self) -> bool {
        self.stop_after_embedded_document
    }
}

/// A builder for [`JsonParserOptions`]
///
/// ```rust
/// use jaxon::feeder::PushJsonFeeder;
/// use jaxon::options::JsonParserOptionsBuilder;
/// use jaxon::JsonParser;
///
/// let feeder = PushJsonFeeder::new();
/// let mut parser = JsonParser::new_with_options(
///     feeder,
///     JsonParserOptionsBuilder::default()
///         .with_allow_comments(true)
///         .with_track_object_members(true)
///         .build(),
/// );
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonParserOptionsBuilder {
    options: JsonParserOptions,
}

impl JsonParserOptionsBuilder {
    /// Fix the input encoding instead of detecting it. With a fixed encoding
    /// the [`EncodingDetected`](crate::JsonEvent::EncodingDetected) event is
    /// not emitted.
    pub fn with_input_encoding(mut self, encoding: Encoding) -> Self {
        self.options.input_encoding = Some(encoding);
        self
    }

    /// Set the encoding in which string tokens are handed to the caller.
    pub fn with_string_encoding(mut self, encoding: Encoding) -> Self {
        self.options.string_encoding = encoding;
        self
    }

    /// Set the encoding in which number tokens are handed to the caller.
    /// Note that the numeric accessors
    /// ([`current_int()`](crate::JsonParser::current_int()) and friends)
    /// require UTF-8.
    pub fn with_number_encoding(mut self, encoding: Encoding) -> Self {
        self.options.number_encoding = encoding;
        self
    }

    /// Limit the length, in encoded bytes, of a single string token. Longer
    /// strings fail the parse with
    /// [`TooLongString`](crate::ErrorKind::TooLongString).
    pub fn with_max_string_length(mut self, max: usize) -> Self {
        self.options.max_string_length = max;
        self
    }

    /// Limit the length, in encoded bytes, of a single number token. Longer
    /// numbers fail the parse with
    /// [`TooLongNumber`](crate::ErrorKind::TooLongNumber).
    pub fn with_max_number_length(mut self, max: usize) -> Self {
        self.options.max_number_length = max;
        self
    }

    /// Accept or reject a leading byte-order mark. Rejected BOMs fail the
    /// parse with [`BomNotAllowed`](crate::ErrorKind::BomNotAllowed).
    pub fn with_allow_bom(mut self, allow: bool) -> Self {
        self.options.allow_bom = allow;
        self
    }

    /// Accept `//` line comments and `/* */` block comments wherever
    /// whitespace is legal.
    pub fn with_allow_comments(mut self, allow: bool) -> Self {
        self.options.allow_comments = allow;
        self
    }

    /// Accept the special numbers `NaN`, `Infinity` and `-Infinity`.
    pub fn with_allow_special_numbers(mut self, allow: bool) -> Self {
        self.options.allow_special_numbers = allow;
        self
    }

    /// Accept positive hexadecimal numbers such as `0xCAFE`.
    pub fn with_allow_hex_numbers(mut self, allow: bool) -> Self {
        self.options.allow_hex_numbers = allow;
        self
    }

    /// Accept unescaped control characters inside strings. Unescaped CR and
    /// LF then advance the line counter like any other line break.
    pub fn with_allow_unescaped_control_characters(mut self, allow: bool) -> Self {
        self.options.allow_unescaped_control_characters = allow;
        self
    }

    /// Replace each maximal invalid input sequence with U+FFFD instead of
    /// failing with
    /// [`InvalidEncodingSequence`](crate::ErrorKind::InvalidEncodingSequence).
    /// Replaced characters are flagged in the string's
    /// [`StringAttributes`](crate::StringAttributes). Number tokens are never
    /// subject to replacement.
    pub fn with_replace_invalid_encoding_sequences(mut self, replace: bool) -> Self {
        self.options.replace_invalid_encoding_sequences = replace;
        self
    }

    /// Track the member names of each open object and fail with
    /// [`DuplicateObjectMember`](crate::ErrorKind::DuplicateObjectMember)
    /// when a name repeats. Names are compared byte for byte in the
    /// configured string encoding.
    pub fn with_track_object_members(mut self, track: bool) -> Self {
        self.options.track_object_members = track;
        self
    }

    /// Stop cleanly after the first top-level value instead of requiring the
    /// input to end. [`JsonParser::next_event()`](crate::JsonParser::next_event())
    /// returns `Ok(None)` at the end of the value;
    /// [`parsed_bytes()`](crate::JsonParser::parsed_bytes()) then tells the
    /// caller where the remainder of the stream begins.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use jaxon::feeder::SliceJsonFeeder;
    /// use jaxon::options::JsonParserOptionsBuilder;
    /// use jaxon::{JsonEvent, JsonParser};
    ///
    /// let stream = b"[1,2]$$$";
    ///
    /// let feeder = SliceJsonFeeder::new(stream);
    /// let mut parser = JsonParser::new_with_options(
    ///     feeder,
    ///     JsonParserOptionsBuilder::default()
    ///         .with_stop_after_embedded_document(true)
    ///         .build(),
    /// );
    ///
    /// let mut events = Vec::new();
    /// while let Some(e) = parser.next_event().unwrap() {
    ///     events.push(e);
    /// }
    ///
    /// assert_eq!(events, vec![
    ///     JsonEvent::EncodingDetected,
    ///     JsonEvent::StartArray,
    ///     JsonEvent::ArrayItem,
    ///     JsonEvent::ValueNumber,
    ///     JsonEvent::ArrayItem,
    ///     JsonEvent::ValueNumber,
    ///     JsonEvent::EndArray,
    /// ]);
    /// assert_eq!(parser.parsed_bytes(), 5);
    /// ```
    pub fn with_stop_after_embedded_document(mut self, stop: bool) -> Self {
        self.options.stop_after_embedded_document = stop;
        self
    }

    /// Create a new [`JsonParserOptions`] object
    pub fn build(self) -> JsonParserOptions {
        self.options
    }
}

/// Options for [`JsonWriter`](crate::JsonWriter). Use
/// [`JsonWriterOptionsBuilder`] to create instances of this struct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonWriterOptions {
    pub(crate) output_encoding: Encoding,
    pub(crate) use_crlf: bool,
    pub(crate) escape_all_non_ascii: bool,
    pub(crate) replace_invalid_encoding_sequences: bool,
}

impl JsonWriterOptions {
    /// The encoding of the produced byte stream.
    pub fn output_encoding(&self) -> Encoding {
        self.output_encoding
    }

    /// Returns `true` if [`write_newline()`](crate::JsonWriter::write_newline())
    /// emits CRLF instead of LF.
    pub fn use_crlf(&self) -> bool {
        self.use_crlf
    }

    /// Returns `true` if every codepoint above U+007F is written as a `\u`
    /// escape.
    pub fn escape_all_non_ascii(&self) -> bool {
        self.escape_all_non_ascii
    }

    /// Returns `true` if invalid sequences in source text are replaced by
    /// U+FFFD instead of failing the write.
    pub fn replace_invalid_encoding_sequences(&self) -> bool {
        self.replace_invalid_encoding_sequences
    }
}

/// A builder for [`JsonWriterOptions`]
///
/// ```rust
/// use jaxon::options::JsonWriterOptionsBuilder;
/// use jaxon::{Encoding, JsonWriter};
///
/// let mut out = Vec::new();
/// let mut writer = JsonWriter::new_with_options(
///     &mut out,
///     JsonWriterOptionsBuilder::default()
///         .with_output_encoding(Encoding::Utf16Le)
///         .build(),
/// );
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonWriterOptionsBuilder {
    options: JsonWriterOptions,
}

impl JsonWriterOptionsBuilder {
    /// Set the encoding of the produced byte stream.
    pub fn with_output_encoding(mut self, encoding: Encoding) -> Self {
        self.options.output_encoding = encoding;
        self
    }

    /// Emit CRLF instead of LF from
    /// [`write_newline()`](crate::JsonWriter::write_newline()).
    pub fn with_use_crlf(mut self, use_crlf: bool) -> Self {
        self.options.use_crlf = use_crlf;
        self
    }

    /// Write every codepoint above U+007F as a `\u` escape (a surrogate pair
    /// for codepoints outside the BMP).
    pub fn with_escape_all_non_ascii(mut self, escape: bool) -> Self {
        self.options.escape_all_non_ascii = escape;
        self
    }

    /// Replace invalid sequences in source text with U+FFFD instead of
    /// failing with
    /// [`InvalidEncodingSequence`](crate::WriteError::InvalidEncodingSequence).
    pub fn with_replace_invalid_encoding_sequences(mut self, replace: bool) -> Self {
        self.options.replace_invalid_encoding_sequences = replace;
        self
    }

    /// Create a new [`JsonWriterOptions`] object
    pub fn build(self) -> JsonWriterOptions {
        self.options
    }
}
