use jaxon::feeder::PushJsonFeeder;
use jaxon::options::JsonParserOptionsBuilder;
use jaxon::JsonParser;

#[macro_use]
extern crate afl;

fn main() {
    fuzz!(|data: &[u8]| {
        let options = JsonParserOptionsBuilder::default()
            .with_allow_comments(true)
            .with_allow_special_numbers(true)
            .with_allow_hex_numbers(true)
            .with_replace_invalid_encoding_sequences(true)
            .with_track_object_members(true)
            .build();
        let mut parser = JsonParser::new_with_options(PushJsonFeeder::new(), options);
        let mut i: usize = 0;
        loop {
            match parser.next_event() {
                Ok(Some(jaxon::JsonEvent::NeedMoreInput)) => {
                    i += parser.feeder.push_bytes(&data[i..]);
                    if i == data.len() {
                        parser.feeder.done();
                    }
                }
                Ok(Some(_)) => {}
                Ok(None) | Err(_) => break,
            }
        }
    });
}
