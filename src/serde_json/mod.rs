use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::error::ParseError;
use crate::feeder::SliceJsonFeeder;
use crate::parser::{InvalidFloatValueError, InvalidStringValueError};
use crate::text::NumberAttributes;
use crate::{JsonEvent, JsonParser};

/// An error that can happen when parsing a byte slice into a Serde JSON
/// [`Value`]
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    InvalidString(#[from] InvalidStringValueError),

    #[error("{0}")]
    InvalidFloat(#[from] InvalidFloatValueError),

    #[error("the JSON text contains a number that cannot be represented")]
    UnrepresentableNumber,

    #[error("the JSON text does not contain a value")]
    NoValue,
}

fn number_value<T>(parser: &JsonParser<T>) -> Result<Value, ParserError>
where
    T: crate::feeder::JsonFeeder,
{
    let attributes = parser.number_attributes();
    if !attributes.intersects(
        NumberAttributes::CONTAINS_DECIMAL_POINT | NumberAttributes::CONTAINS_EXPONENT,
    ) {
        if let Ok(i) = parser.current_int::<i64>() {
            return Ok(Value::Number(Number::from(i)));
        }
    }
    let f = parser.current_float()?;
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or(ParserError::UnrepresentableNumber)
}

/// Parse a byte slice into a Serde JSON [`Value`]
///
/// ```
/// use serde_json::json;
/// use jaxon::serde_json::from_slice;
///
/// let json = br#"{"name": "Elvis"}"#;
/// let expected = json!({
///     "name": "Elvis"
/// });
/// let actual = from_slice(json).unwrap();
/// assert_eq!(expected, actual);
/// ```
pub fn from_slice(v: &[u8]) -> Result<Value, ParserError> {
    let feeder = SliceJsonFeeder::new(v);
    let mut parser = JsonParser::new(feeder);

    let mut stack: Vec<(Option<String>, Value)> = vec![];
    let mut result = None;
    let mut current_key: Option<String> = None;

    while let Some(event) = parser.next_event()? {
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
                current_key = Some(parser.current_str()?.to_string());
                continue;
            }

            JsonEvent::EndObject | JsonEvent::EndArray => {
                // attached to the parent below, like any other value
                let (key, v) = match stack.pop() {
                    Some(top) => top,
                    None => return Err(ParserError::NoValue),
                };
                current_key = key;
                v
            }

            JsonEvent::ValueString => Value::String(parser.current_str()?.to_string()),
            JsonEvent::ValueNumber | JsonEvent::ValueSpecialNumber => number_value(&parser)?,
            JsonEvent::ValueTrue => Value::Bool(true),
            JsonEvent::ValueFalse => Value::Bool(false),
            JsonEvent::ValueNull => Value::Null,
        };

        if let Some((_, top)) = stack.last_mut() {
            if let Some(m) = top.as_object_mut() {
                if let Some(k) = current_key.take() {
                    m.insert(k, value);
                }
            } else if let Some(a) = top.as_array_mut() {
                a.push(value);
            }
        } else {
            result = Some(value);
        }
    }

    result.ok_or(ParserError::NoValue)
}

#[cfg(test)]
mod test {
    use super::from_slice;
    use serde_json::json;

    /// Test that a complex document ends up as the equivalent Value tree
    #[test]
    fn nested() {
        let json = br#"{"a": [1, 2.5, {"b": null}], "c": false, "d": "x"}"#;
        let expected = json!({
            "a": [1, 2.5, {"b": null}],
            "c": false,
            "d": "x"
        });
        assert_eq!(from_slice(json).unwrap(), expected);
    }

    /// Test that large integers survive without a float detour
    #[test]
    fn big_int() {
        let v = from_slice(b"9007199254740993").unwrap();
        assert_eq!(v.as_i64(), Some(9007199254740993));
    }

    /// Test that parse failures surface as errors
    #[test]
    fn syntax_error() {
        assert!(from_slice(b"{\"a\":}").is_err());
        assert!(from_slice(b"").is_err());
    }
}
