#![cfg(feature = "tokio")]

use jaxon::tokio::AsyncBufReaderJsonFeeder;
use jaxon::{JsonEvent, JsonParser};

/// Test that the parser can be driven from an asynchronous reader
#[tokio::test]
async fn parse_from_async_reader() {
    let json: &[u8] = br#"{"name":"Elvis","albums":[1956,1957]}"#;

    let feeder = AsyncBufReaderJsonFeeder::new(json);
    let mut parser = JsonParser::new(feeder);

    let mut events = vec![];
    let mut names = vec![];
    loop {
        match parser.next_event().unwrap() {
            Some(JsonEvent::NeedMoreInput) => parser.feeder.fill_buf().await.unwrap(),
            Some(event) => {
                if event == JsonEvent::FieldName {
                    names.push(parser.current_str().unwrap().to_string());
                }
                events.push(event);
            }
            None => break,
        }
    }

    assert_eq!(
        events,
        vec![
            JsonEvent::EncodingDetected,
            JsonEvent::StartObject,
            JsonEvent::FieldName,
            JsonEvent::ValueString,
            JsonEvent::FieldName,
            JsonEvent::StartArray,
            JsonEvent::ArrayItem,
            JsonEvent::ValueNumber,
            JsonEvent::ArrayItem,
            JsonEvent::ValueNumber,
            JsonEvent::EndArray,
            JsonEvent::EndObject,
        ]
    );
    assert_eq!(names, vec!["name", "albums"]);
}
