use std::io;

use jaxon::feeder::SliceJsonFeeder;
use jaxon::options::{JsonParserOptionsBuilder, JsonWriterOptions, JsonWriterOptionsBuilder};
use jaxon::{
    Encoding, ErrorKind, JsonEvent, JsonParser, JsonWriter, SpecialNumber, WriteError,
};

fn utf8_writer() -> JsonWriter<Vec<u8>> {
    JsonWriter::new(vec![])
}

fn writer_with(options: JsonWriterOptions) -> JsonWriter<Vec<u8>> {
    JsonWriter::new_with_options(vec![], options)
}

/// Test writing a flat document with explicit punctuation
#[test]
fn simple_object() {
    let mut writer = utf8_writer();
    writer.write_start_object().unwrap();
    writer.write_str("name").unwrap();
    writer.write_colon().unwrap();
    writer.write_str("Elvis").unwrap();
    writer.write_comma().unwrap();
    writer.write_str("alive").unwrap();
    writer.write_colon().unwrap();
    writer.write_boolean(false).unwrap();
    writer.write_comma().unwrap();
    writer.write_str("songs").unwrap();
    writer.write_colon().unwrap();
    writer.write_null().unwrap();
    writer.write_end_object().unwrap();

    assert_eq!(
        writer.sink,
        br#"{"name":"Elvis","alive":false,"songs":null}"#
    );
}

/// Test that formatting whitespace may go anywhere without confusing the
/// state machine
#[test]
fn formatted_array() {
    let mut writer = utf8_writer();
    writer.write_start_array().unwrap();
    writer.write_newline().unwrap();
    writer.write_space(2).unwrap();
    writer.write_number(b"1", Encoding::Utf8).unwrap();
    writer.write_comma().unwrap();
    writer.write_newline().unwrap();
    writer.write_space(2).unwrap();
    writer.write_number(b"2", Encoding::Utf8).unwrap();
    writer.write_newline().unwrap();
    writer.write_end_array().unwrap();
    writer.write_newline().unwrap();

    assert_eq!(writer.sink, b"[\n  1,\n  2\n]\n");
}

#[test]
fn crlf_newlines() {
    let options = JsonWriterOptionsBuilder::default().with_use_crlf(true).build();
    let mut writer = writer_with(options);
    writer.write_start_array().unwrap();
    writer.write_newline().unwrap();
    writer.write_end_array().unwrap();
    assert_eq!(writer.sink, b"[\r\n]");
}

/// Test the mandatory escapes: quote, backslash, control characters, and
/// the Javascript line separators
#[test]
fn string_escaping() {
    let mut writer = utf8_writer();
    writer
        .write_str("a\"b\\c\u{8}d\u{2028}e\u{2029}f/g")
        .unwrap();
    assert_eq!(
        writer.sink,
        b"\"a\\\"b\\\\c\\u0008d\\u2028e\\u2029f/g\""
    );
}

/// Non-ASCII text passes through unescaped by default and is escaped
/// entirely when requested
#[test]
fn non_ascii_escaping() {
    let mut writer = utf8_writer();
    writer.write_str("é𝄞").unwrap();
    assert_eq!(writer.sink, "\"é𝄞\"".as_bytes());

    let options = JsonWriterOptionsBuilder::default()
        .with_escape_all_non_ascii(true)
        .build();
    let mut writer = writer_with(options);
    writer.write_str("Aé𝄞").unwrap();
    assert_eq!(writer.sink, br#""A\u00E9\uD834\uDD1E""#);
}

/// Test transcoding: UTF-16 source text, UTF-16 output stream
#[test]
fn output_encodings() {
    let options = JsonWriterOptionsBuilder::default()
        .with_output_encoding(Encoding::Utf16Le)
        .build();
    let mut writer = writer_with(options);
    writer.write_str("A").unwrap();
    assert_eq!(writer.sink, &[0x22, 0x00, 0x41, 0x00, 0x22, 0x00]);

    // UTF-16BE source text into a UTF-8 stream
    let mut writer = utf8_writer();
    writer
        .write_string(&[0x00, 0x41, 0x00, 0xE9], Encoding::Utf16Be)
        .unwrap();
    assert_eq!(writer.sink, "\"Aé\"".as_bytes());
}

/// Test number validation: the writer passes valid text through unchanged
/// and rejects anything else without output
#[test]
fn number_validation() {
    let mut writer = utf8_writer();
    writer.write_start_array().unwrap();
    writer.write_number(b"3.14159", Encoding::Utf8).unwrap();
    writer.write_comma().unwrap();
    writer.write_number(b"-2e-5", Encoding::Utf8).unwrap();
    writer.write_comma().unwrap();
    writer.write_number(b"0xCAFE", Encoding::Utf8).unwrap();
    writer.write_end_array().unwrap();
    assert_eq!(writer.sink, b"[3.14159,-2e-5,0xCAFE]");

    for bad in [&b"01"[..], b"1.", b"+1", b"0x", b"NaN", b"1e", b"--2"] {
        let mut writer = utf8_writer();
        let err = writer.write_number(bad, Encoding::Utf8).unwrap_err();
        assert!(matches!(err, WriteError::InvalidNumber), "{bad:?}");
        assert!(writer.sink.is_empty(), "{bad:?} produced output");
    }

    // digits in a non-UTF-8 source encoding are fine, non-ASCII text is not
    let mut writer = utf8_writer();
    writer
        .write_number(&[0x31, 0x00, 0x32, 0x00], Encoding::Utf16Le)
        .unwrap();
    assert_eq!(writer.sink, b"12");

    let mut writer = utf8_writer();
    let err = writer.write_number("é1".as_bytes(), Encoding::Utf8).unwrap_err();
    assert!(matches!(err, WriteError::InvalidNumber));
}

#[test]
fn special_numbers() {
    let mut writer = utf8_writer();
    writer.write_start_array().unwrap();
    writer.write_special_number(SpecialNumber::NaN).unwrap();
    writer.write_comma().unwrap();
    writer.write_special_number(SpecialNumber::Infinity).unwrap();
    writer.write_comma().unwrap();
    writer
        .write_special_number(SpecialNumber::NegInfinity)
        .unwrap();
    writer.write_end_array().unwrap();
    assert_eq!(writer.sink, b"[NaN,Infinity,-Infinity]");
}

/// Every misplaced operation is rejected with `UnexpectedToken` before any
/// byte reaches the sink
#[test]
fn state_machine_rejections() {
    // two top-level values
    let mut writer = utf8_writer();
    writer.write_null().unwrap();
    assert!(matches!(
        writer.write_null(),
        Err(WriteError::UnexpectedToken)
    ));

    // closing the wrong container
    let mut writer = utf8_writer();
    writer.write_start_array().unwrap();
    assert!(matches!(
        writer.write_end_object(),
        Err(WriteError::UnexpectedToken)
    ));

    // colon without a member name
    let mut writer = utf8_writer();
    writer.write_start_object().unwrap();
    assert!(matches!(
        writer.write_colon(),
        Err(WriteError::UnexpectedToken)
    ));

    // comma before the first element
    let mut writer = utf8_writer();
    writer.write_start_array().unwrap();
    assert!(matches!(
        writer.write_comma(),
        Err(WriteError::UnexpectedToken)
    ));

    // a member value without a colon
    let mut writer = utf8_writer();
    writer.write_start_object().unwrap();
    writer.write_str("a").unwrap();
    assert!(matches!(
        writer.write_str("b"),
        Err(WriteError::UnexpectedToken)
    ));

    // a non-string member name
    let mut writer = utf8_writer();
    writer.write_start_object().unwrap();
    assert!(matches!(
        writer.write_number(b"1", Encoding::Utf8),
        Err(WriteError::UnexpectedToken)
    ));

    // closing a container after a comma
    let mut writer = utf8_writer();
    writer.write_start_array().unwrap();
    writer.write_null().unwrap();
    writer.write_comma().unwrap();
    assert!(matches!(
        writer.write_end_array(),
        Err(WriteError::UnexpectedToken)
    ));
}

/// After any failure the writer stays in the error state until it is reset
#[test]
fn errors_are_sticky() {
    let mut writer = utf8_writer();
    writer.write_null().unwrap();
    assert!(writer.write_null().is_err());
    assert_eq!(writer.error(), Some(ErrorKind::UnexpectedToken));

    // even a legal operation is refused now
    assert!(writer.write_space(1).is_err());

    writer.reset();
    assert_eq!(writer.error(), None);
    writer.write_boolean(true).unwrap();
    assert_eq!(writer.sink, b"nulltrue");
}

/// Test that invalid source text is rejected, or replaced when configured
#[test]
fn invalid_source_text() {
    let mut writer = utf8_writer();
    let err = writer.write_string(&[0x61, 0x80], Encoding::Utf8).unwrap_err();
    assert!(matches!(err, WriteError::InvalidEncodingSequence));
    assert!(writer.sink.is_empty());

    let options = JsonWriterOptionsBuilder::default()
        .with_replace_invalid_encoding_sequences(true)
        .build();
    let mut writer = writer_with(options);
    writer.write_string(&[0x61, 0x80], Encoding::Utf8).unwrap();
    assert_eq!(writer.sink, "\"a\u{FFFD}\"".as_bytes());

    // numbers are never replaced
    let mut writer = writer_with(options);
    assert!(writer.write_number(&[0x31, 0x80], Encoding::Utf8).is_err());
}

/// A sink error is the abort signal and sticks
#[test]
fn aborting_sink() {
    struct FailingSink;

    impl io::Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "abort"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let mut writer = JsonWriter::new(FailingSink);
    let err = writer.write_null().unwrap_err();
    assert!(matches!(err, WriteError::Aborted(_)));
    assert_eq!(err.kind(), ErrorKind::AbortedByHandler);
    assert_eq!(writer.error(), Some(ErrorKind::AbortedByHandler));
    assert!(writer.write_null().is_err());
}

#[test]
fn empty_containers() {
    let mut writer = utf8_writer();
    writer.write_start_object().unwrap();
    writer.write_end_object().unwrap();
    assert_eq!(writer.sink, b"{}");

    let mut writer = utf8_writer();
    writer.write_start_array().unwrap();
    writer.write_start_array().unwrap();
    writer.write_end_array().unwrap();
    writer.write_comma().unwrap();
    writer.write_start_object().unwrap();
    writer.write_end_object().unwrap();
    writer.write_end_array().unwrap();
    assert_eq!(writer.sink, b"[[],{}]");
}

/// Parse a string in encoding A with string output B, write it with source
/// B and output C, parse again: the codepoints survive
#[test]
fn encoding_round_trip() {
    let original = r#""héllo 𝄞""#.as_bytes();

    // parse UTF-8 input, hand the string out as UTF-16LE
    let options = JsonParserOptionsBuilder::default()
        .with_string_encoding(Encoding::Utf16Le)
        .build();
    let mut parser = JsonParser::new_with_options(SliceJsonFeeder::new(original), options);
    loop {
        match parser.next_event().unwrap() {
            Some(JsonEvent::ValueString) => break,
            Some(_) => {}
            None => panic!("expected a string"),
        }
    }
    let utf16 = parser.current_bytes().to_vec();

    // write the UTF-16LE text into a UTF-32BE stream
    let writer_options = JsonWriterOptionsBuilder::default()
        .with_output_encoding(Encoding::Utf32Be)
        .build();
    let mut writer = writer_with(writer_options);
    writer.write_string(&utf16, Encoding::Utf16Le).unwrap();
    let utf32 = writer.sink;

    // parse the produced stream and compare the decoded text
    let parser_options = JsonParserOptionsBuilder::default()
        .with_input_encoding(Encoding::Utf32Be)
        .build();
    let mut parser =
        JsonParser::new_with_options(SliceJsonFeeder::new(&utf32), parser_options);
    loop {
        match parser.next_event().unwrap() {
            Some(JsonEvent::ValueString) => break,
            Some(_) => {}
            None => panic!("expected a string"),
        }
    }
    assert_eq!(parser.current_str().unwrap(), "héllo 𝄞");
}
