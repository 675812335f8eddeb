/// All possible JSON events returned by [`JsonParser::next_event()`](crate::JsonParser::next_event())
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JsonEvent {
    /// The JSON parser needs more input before the next event can be
    /// returned. Push more bytes into the parser's feeder to continue.
    NeedMoreInput,

    /// The input encoding has been detected. Call
    /// [`JsonParser::input_encoding()`](crate::JsonParser::input_encoding())
    /// to get it. This event is emitted at most once, before any other event,
    /// and only if the parser was configured to auto-detect the encoding.
    EncodingDetected,

    /// The start of a JSON object.
    StartObject,

    /// The end of a JSON object.
    EndObject,

    /// The start of a JSON array.
    StartArray,

    /// The end of a JSON array.
    EndArray,

    /// An element of the enclosing array is about to begin. The element's
    /// value event (or [`StartObject`](Self::StartObject)/
    /// [`StartArray`](Self::StartArray)) follows.
    ArrayItem,

    /// An object member name. Call
    /// [`JsonParser::current_bytes()`](crate::JsonParser::current_bytes()) or
    /// [`JsonParser::current_str()`](crate::JsonParser::current_str()) to get
    /// the name.
    FieldName,

    /// A string value. Call
    /// [`JsonParser::current_bytes()`](crate::JsonParser::current_bytes()) or
    /// [`JsonParser::current_str()`](crate::JsonParser::current_str()) to get
    /// the value, and
    /// [`JsonParser::string_attributes()`](crate::JsonParser::string_attributes())
    /// for its attributes.
    ValueString,

    /// A number value. The parser never interprets digits; call
    /// [`JsonParser::current_bytes()`](crate::JsonParser::current_bytes()) to
    /// get the original text,
    /// [`JsonParser::number_attributes()`](crate::JsonParser::number_attributes())
    /// for its shape, or one of
    /// [`JsonParser::current_int()`](crate::JsonParser::current_int()) and
    /// [`JsonParser::current_float()`](crate::JsonParser::current_float()) to
    /// choose an interpretation.
    ValueNumber,

    /// One of the special numbers `NaN`, `Infinity` or `-Infinity`. Only
    /// emitted if the parser was configured to allow them. Call
    /// [`JsonParser::current_special_number()`](crate::JsonParser::current_special_number())
    /// to get the value.
    ValueSpecialNumber,

    /// The boolean value `true`.
    ValueTrue,

    /// The boolean value `false`.
    ValueFalse,

    /// A `null` value.
    ValueNull,
}

/// The special numbers that are not part of the JSON grammar but can be
/// enabled through
/// [`with_allow_special_numbers`](crate::options::JsonParserOptionsBuilder::with_allow_special_numbers).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpecialNumber {
    NaN,
    Infinity,
    NegInfinity,
}

impl SpecialNumber {
    /// The literal text of this special number.
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialNumber::NaN => "NaN",
            SpecialNumber::Infinity => "Infinity",
            SpecialNumber::NegInfinity => "-Infinity",
        }
    }
}
