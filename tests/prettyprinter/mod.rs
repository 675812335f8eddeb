use jaxon::feeder::JsonFeeder;
use jaxon::{
    InvalidFloatValueError, InvalidStringValueError, JsonEvent, JsonParser, JsonWriter,
    NumberAttributes, WriteError,
};
use thiserror::Error;

enum Type {
    Object,
    Array,
}

/// An error that can happen when pretty-printing a JSON document. Either a
/// token cannot be read from the parser or the writer rejects it.
#[derive(Error, Debug)]
pub enum PrettyPrintError {
    #[error("{0}")]
    Write(#[from] WriteError),

    #[error("{0}")]
    InvalidStringValue(#[from] InvalidStringValueError),

    #[error("{0}")]
    InvalidFloatValue(#[from] InvalidFloatValueError),
}

/// Demonstrates how parser events can be piped into a [`JsonWriter`] to
/// pretty-print a JSON document. The writer validates the nesting; this
/// struct only decides where to put line breaks and indentation.
pub struct PrettyPrinter {
    writer: JsonWriter<Vec<u8>>,
    types: Vec<Type>,
    element_counts: Vec<i32>,
    level: usize,
}

impl PrettyPrinter {
    pub fn new() -> Self {
        PrettyPrinter {
            writer: JsonWriter::new(vec![]),
            types: vec![],
            element_counts: vec![],
            level: 0,
        }
    }

    fn break_line(&mut self) -> Result<(), PrettyPrintError> {
        self.writer.write_newline()?;
        self.writer.write_space(self.level * 2)?;
        Ok(())
    }

    /// Emit the separators that go before an array element or a lone value
    fn on_value(&mut self) -> Result<(), PrettyPrintError> {
        if let Some(Type::Array) = self.types.last() {
            if let Some(count) = self.element_counts.pop() {
                if count > 0 {
                    self.writer.write_comma()?;
                }
                self.break_line()?;
                self.element_counts.push(count + 1);
            }
        }
        Ok(())
    }

    fn on_field_name(&mut self, name: &[u8]) -> Result<(), PrettyPrintError> {
        if let Some(count) = self.element_counts.pop() {
            if count > 0 {
                self.writer.write_comma()?;
            }
            self.element_counts.push(count + 1);
        }
        self.break_line()?;
        self.writer.write_string(name, Default::default())?;
        self.writer.write_colon()?;
        self.writer.write_space(1)?;
        Ok(())
    }

    fn on_start(&mut self, t: Type) -> Result<(), PrettyPrintError> {
        self.on_value()?;
        match t {
            Type::Object => self.writer.write_start_object()?,
            Type::Array => self.writer.write_start_array()?,
        }
        self.level += 1;
        self.types.push(t);
        self.element_counts.push(0);
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), PrettyPrintError> {
        self.level -= 1;
        let t = self.types.pop();
        if self.element_counts.pop().unwrap_or(0) > 0 {
            self.break_line()?;
        }
        match t {
            Some(Type::Object) => self.writer.write_end_object()?,
            _ => self.writer.write_end_array()?,
        }
        Ok(())
    }

    pub fn on_event<T>(
        &mut self,
        event: JsonEvent,
        parser: &JsonParser<T>,
    ) -> Result<(), PrettyPrintError>
    where
        T: JsonFeeder,
    {
        match event {
            JsonEvent::NeedMoreInput => {}
            JsonEvent::EncodingDetected => {}
            JsonEvent::ArrayItem => {}
            JsonEvent::StartObject => self.on_start(Type::Object)?,
            JsonEvent::EndObject => self.on_end()?,
            JsonEvent::StartArray => self.on_start(Type::Array)?,
            JsonEvent::EndArray => self.on_end()?,
            JsonEvent::FieldName => {
                let name = parser.current_bytes().to_vec();
                self.on_field_name(&name)?;
            }
            JsonEvent::ValueString => {
                self.on_value()?;
                let value = parser.current_bytes().to_vec();
                self.writer.write_string(&value, Default::default())?;
            }
            JsonEvent::ValueNumber => {
                self.on_value()?;
                let attributes = parser.number_attributes();
                if attributes.intersects(
                    NumberAttributes::CONTAINS_DECIMAL_POINT
                        | NumberAttributes::CONTAINS_EXPONENT,
                ) {
                    // normalize the float's text representation
                    let mut buf = dtoa::Buffer::new();
                    let text = buf.format(parser.current_float()?).to_string();
                    self.writer.write_number(text.as_bytes(), Default::default())?;
                } else {
                    let text = parser.current_bytes().to_vec();
                    self.writer.write_number(&text, Default::default())?;
                }
            }
            JsonEvent::ValueSpecialNumber => {
                self.on_value()?;
                if let Some(special) = parser.current_special_number() {
                    self.writer.write_special_number(special)?;
                }
            }
            JsonEvent::ValueTrue => {
                self.on_value()?;
                self.writer.write_boolean(true)?;
            }
            JsonEvent::ValueFalse => {
                self.on_value()?;
                self.writer.write_boolean(false)?;
            }
            JsonEvent::ValueNull => {
                self.on_value()?;
                self.writer.write_null()?;
            }
        }
        Ok(())
    }

    pub fn get_result(&self) -> &[u8] {
        &self.writer.sink
    }
}
