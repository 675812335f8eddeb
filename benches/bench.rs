use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{Map, Number, Value};

use jaxon::feeder::SliceJsonFeeder;
use jaxon::{JsonEvent, JsonParser, NumberAttributes};

fn make_large(json: &str) -> String {
    let mut large = String::from("{");
    for i in 0..10000 {
        if large.len() > 1 {
            large.push(',');
        }
        large.push_str(&format!(r#""{}":"#, i));
        large.push_str(json);
    }
    large.push('}');
    large
}

/// Walk the event stream without building anything
fn jaxon_events(json_bytes: &[u8]) {
    let mut parser = JsonParser::new(SliceJsonFeeder::new(json_bytes));
    loop {
        match parser.next_event() {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => panic!("parser error: {e}"),
        }
    }
}

/// Build a Serde JSON Value from the event stream
fn jaxon_to_value(json_bytes: &[u8]) -> Value {
    let mut parser = JsonParser::new(SliceJsonFeeder::new(json_bytes));

    let mut stack: Vec<(Option<String>, Value)> = vec![];
    let mut result = None;
    let mut current_key: Option<String> = None;

    loop {
        let event = match parser.next_event() {
            Ok(Some(e)) => e,
            Ok(None) => break,
            Err(e) => panic!("parser error: {e}"),
        };

        let value = match event {
            JsonEvent::NeedMoreInput
            | JsonEvent::EncodingDetected
            | JsonEvent::ArrayItem => continue,

            JsonEvent::StartObject | JsonEvent::StartArray => {
                let v = if event == JsonEvent::StartObject {
                    Value::Object(Map::new())
                } else {
                    Value::Array(vec![])
                };
                stack.push((current_key.take(), v));
                continue;
            }

            JsonEvent::FieldName => {
                current_key = Some(parser.current_str().unwrap().to_string());
                continue;
            }

            JsonEvent::EndObject | JsonEvent::EndArray => {
                let (key, v) = stack.pop().unwrap();
                current_key = key;
                v
            }

            JsonEvent::ValueString => Value::String(parser.current_str().unwrap().to_string()),
            JsonEvent::ValueNumber | JsonEvent::ValueSpecialNumber => {
                if parser.number_attributes().intersects(
                    NumberAttributes::CONTAINS_DECIMAL_POINT
                        | NumberAttributes::CONTAINS_EXPONENT,
                ) {
                    Value::Number(Number::from_f64(parser.current_float().unwrap()).unwrap())
                } else {
                    Value::Number(Number::from(parser.current_int::<i64>().unwrap()))
                }
            }
            JsonEvent::ValueTrue => Value::Bool(true),
            JsonEvent::ValueFalse => Value::Bool(false),
            JsonEvent::ValueNull => Value::Null,
        };

        if let Some((_, top)) = stack.last_mut() {
            if let Some(m) = top.as_object_mut() {
                m.insert(current_key.take().unwrap(), value);
            } else if let Some(a) = top.as_array_mut() {
                a.push(value);
            }
        } else {
            result = Some(value);
        }
    }

    result.unwrap()
}

fn serde_parse(json_bytes: &[u8]) -> Value {
    serde_json::from_slice(json_bytes).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let json = r#"{"name":"Elvis","albums":[1956,1958,1960],"pi":3.14159,"alive":false}"#;
    let large = make_large(json);
    let bytes = large.as_bytes();

    c.bench_function("events", |b| b.iter(|| jaxon_events(bytes)));
    c.bench_function("to_value", |b| b.iter(|| jaxon_to_value(bytes)));
    c.bench_function("serde", |b| b.iter(|| serde_parse(bytes)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
