//! # Jaxon
//!
//! An incremental, non-blocking, SAX-style JSON parser and writer.
//!
//! The parser consumes a JSON document as a sequence of byte chunks and
//! reports it as a linear stream of events — container boundaries, member
//! names, values — annotated with source locations. It never builds a
//! document tree; what to build is the caller's decision. The input encoding
//! (UTF-8, UTF-16LE/BE or UTF-32LE/BE) is detected from the first bytes of
//! the stream, and string and number text is handed to the caller already
//! transcoded to a configurable output encoding. The [`JsonWriter`] is the
//! mirror image: it accepts one token-emission call at a time, validates the
//! nesting, and produces a well-formed, properly escaped byte stream.
//!
//! ## Examples
//!
//! ### Push-based parsing
//!
//! Push-based parsing is the most flexible way of using Jaxon. Push new
//! bytes into a [`PushJsonFeeder`](crate::feeder::PushJsonFeeder) and then
//! let the parser consume them until it returns
//! [`JsonEvent::NeedMoreInput`]. Repeat this process until you receive
//! `Ok(None)` (the end of the document) or an error.
//!
//! This approach is very low-level but gives you the freedom to provide new
//! bytes to the parser whenever they are available and to generate new JSON
//! events whenever you need them.
//!
//! ```
//! use jaxon::{JsonParser, JsonEvent};
//! use jaxon::feeder::PushJsonFeeder;
//!
//! let json = br#"{"name": "Elvis"}"#;
//!
//! let mut parser = JsonParser::new(PushJsonFeeder::new());
//! let mut i: usize = 0;
//! loop {
//!     // feed as many bytes as possible to the parser
//!     let mut event = parser.next_event().unwrap();
//!     while event == Some(JsonEvent::NeedMoreInput) {
//!         i += parser.feeder.push_bytes(&json[i..]);
//!         if i == json.len() {
//!             parser.feeder.done();
//!         }
//!         event = parser.next_event().unwrap();
//!     }
//!
//!     // do something useful with `event`
//!     // match event {
//!     //     ...
//!     // }
//!
//!     if event.is_none() {
//!         break;
//!     }
//! }
//! ```
//!
//! ### Parsing a slice of bytes
//!
//! For convenience, [`SliceJsonFeeder`](crate::feeder::SliceJsonFeeder)
//! allows you to feed the parser from a slice of bytes.
//!
//! ```
//! use jaxon::{JsonParser, JsonEvent};
//! use jaxon::feeder::SliceJsonFeeder;
//!
//! let json = br#"{"name": "Elvis"}"#;
//!
//! let mut parser = JsonParser::new(SliceJsonFeeder::new(json));
//!
//! let mut names = Vec::new();
//! while let Some(event) = parser.next_event().unwrap() {
//!     if event == JsonEvent::FieldName {
//!         names.push(parser.current_str().unwrap().to_string());
//!     }
//! }
//!
//! assert_eq!(names, vec!["name"]);
//! ```
//!
//! ### Parsing from a `BufReader`
//!
//! [`BufReaderJsonFeeder`](crate::feeder::BufReaderJsonFeeder) allows you to
//! feed the parser from a [`BufReader`](std::io::BufReader). This is useful
//! if you want to parse JSON from a file or a network connection.
//!
//! ```no_run
//! use jaxon::{JsonParser, JsonEvent};
//!
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = File::open("data.json").unwrap();
//! let mut reader = BufReader::new(file);
//!
//! let feeder = jaxon::feeder::BufReaderJsonFeeder::new(&mut reader);
//! let mut parser = JsonParser::new(feeder);
//! loop {
//!     let mut event = parser.next_event().unwrap();
//!     if event == Some(JsonEvent::NeedMoreInput) {
//!         parser.feeder.fill_buf().unwrap();
//!         event = parser.next_event().unwrap();
//!     }
//!
//!     // do something useful with `event`
//!
//!     if event.is_none() {
//!         break;
//!     }
//! }
//! ```
//!
//! ### Writing
//!
//! [`JsonWriter`] emits to any [`std::io::Write`] sink. Punctuation and
//! formatting whitespace are under the caller's control; the writer checks
//! that every call is legal at its position.
//!
//! ```
//! use jaxon::JsonWriter;
//!
//! let mut out = Vec::new();
//! let mut writer = JsonWriter::new(&mut out);
//! writer.write_start_array().unwrap();
//! writer.write_number(b"1", Default::default()).unwrap();
//! writer.write_comma().unwrap();
//! writer.write_str("two").unwrap();
//! writer.write_end_array().unwrap();
//!
//! assert_eq!(out, br#"[1,"two"]"#);
//! ```
//!
//! ### Parsing into a Serde JSON Value
//!
//! For testing and compatibility reasons, Jaxon is able to parse a byte
//! slice into a [Serde JSON](https://github.com/serde-rs/json) Value.
//!
//! Heads up: You need to enable the `serde_json` feature for this.
//!
//! ```
//! # #[cfg(feature = "serde_json")] {
//! use jaxon::serde_json::from_slice;
//!
//! let json = br#"{"name": "Elvis"}"#;
//! let value = from_slice(json).unwrap();
//!
//! assert!(value.is_object());
//! assert_eq!(value["name"], "Elvis");
//! # }
//! ```
//!
//! However, if you find yourself doing this, you probably don't need the
//! reactive features of Jaxon and your data seems to completely fit into
//! memory. In this case, you're most likely better off using Serde JSON
//! directly.
mod container;
mod encoding;
mod error;
mod event;
pub mod feeder;
mod location;
pub mod options;
mod parser;
mod reset;
mod text;
mod writer;

#[cfg(feature = "serde_json")]
pub mod serde_json;

#[cfg(feature = "tokio")]
pub mod tokio;

pub use encoding::Encoding;
pub use error::{ErrorKind, ParseError, WriteError};
pub use event::{JsonEvent, SpecialNumber};
pub use location::Location;
pub use parser::{
    InvalidFloatValueError, InvalidIntValueError, InvalidStringValueError, JsonParser,
};
pub use reset::Reset;
pub use text::{NumberAttributes, StringAttributes};
pub use writer::JsonWriter;

/// The version of this library
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

/// The version of this library at compile time
pub fn library_version() -> Version {
    fn component(s: &str) -> u32 {
        s.parse().unwrap_or(0)
    }
    Version {
        major: component(env!("CARGO_PKG_VERSION_MAJOR")),
        minor: component(env!("CARGO_PKG_VERSION_MINOR")),
        micro: component(env!("CARGO_PKG_VERSION_PATCH")),
    }
}
