//! FILENAME: tabular-convert/src/text.rs
//! PURPOSE: Parses text into typed values.
//! CONTEXT: `can_convert` answers by attempting the parse, so a column of
//! mixed clean and dirty text is available row by row.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use tabular_engine::{ConversionError, OnDemandConverter, ResultMetadata, Value, ValueType};

use crate::profile::FormatSettings;

#[derive(Debug, Clone, Default)]
pub struct TextConverter {
    formats: FormatSettings,
}

impl TextConverter {
    pub fn new(formats: FormatSettings) -> Self {
        TextConverter { formats }
    }

    pub fn formats(&self) -> &FormatSettings {
        &self.formats
    }

    fn attempt(&self, value: &Value, desired: ValueType) -> Result<Value, ConversionError> {
        let Value::Text(text) = value else {
            return Err(ConversionError::unsupported(value, desired));
        };
        let trimmed = text.trim();

        let converted = match desired {
            ValueType::Any | ValueType::Text => value.clone(),
            ValueType::Boolean => Value::Boolean(
                self.formats
                    .parse_boolean(trimmed)
                    .ok_or_else(|| not_a(text, desired))?,
            ),
            ValueType::Byte => Value::Byte(parse(trimmed, desired)?),
            ValueType::Short => Value::Short(parse(trimmed, desired)?),
            ValueType::Int => Value::Int(parse(trimmed, desired)?),
            ValueType::Long => Value::Long(parse(trimmed, desired)?),
            ValueType::Float => Value::Float(parse_f32(trimmed, desired)?),
            ValueType::Double => Value::Double(parse(trimmed, desired)?),
            ValueType::Decimal => Value::Decimal(parse::<BigDecimal>(trimmed, desired)?),
            ValueType::Number => match trimmed.parse::<i64>() {
                Ok(n) => Value::Long(n),
                Err(_) => Value::Double(parse(trimmed, desired)?),
            },
            ValueType::Date => Value::Date(self.parse_date(trimmed).ok_or_else(|| not_a(text, desired))?),
            ValueType::Time => Value::Time(self.parse_time(trimmed).ok_or_else(|| not_a(text, desired))?),
            ValueType::Timestamp => Value::Timestamp(
                self.parse_timestamp(trimmed)
                    .ok_or_else(|| not_a(text, desired))?,
            ),
            ValueType::Temporal => {
                if let Some(ts) = self.parse_timestamp(trimmed) {
                    Value::Timestamp(ts)
                } else if let Some(d) = self.parse_date(trimmed) {
                    Value::Date(d)
                } else if let Some(t) = self.parse_time(trimmed) {
                    Value::Time(t)
                } else {
                    return Err(not_a(text, desired));
                }
            }
            ValueType::Binary => Value::Binary(text.as_bytes().to_vec()),
            ValueType::Opaque => return Err(ConversionError::unsupported(value, desired)),
        };
        Ok(converted)
    }

    fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        self.formats
            .date_formats
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
    }

    fn parse_time(&self, text: &str) -> Option<NaiveTime> {
        self.formats
            .time_formats
            .iter()
            .find_map(|f| NaiveTime::parse_from_str(text, f).ok())
    }

    fn parse_timestamp(&self, text: &str) -> Option<NaiveDateTime> {
        self.formats
            .timestamp_formats
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
    }
}

fn parse<T>(text: &str, desired: ValueType) -> Result<T, ConversionError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.parse::<T>()
        .map_err(|e| ConversionError::new(format!("cannot parse '{}' as {}: {}", text, desired, e)))
}

/// Finite text that overflows `f32` is out of range rather than infinite,
/// as in `NumericConverter`.
fn parse_f32(text: &str, desired: ValueType) -> Result<f32, ConversionError> {
    let n: f32 = parse(text, desired)?;
    if n.is_infinite() && parse::<f64>(text, desired)?.is_finite() {
        return Err(ConversionError::new(format!("{} is out of range for {}", text, desired)));
    }
    Ok(n)
}

fn not_a(text: &str, desired: ValueType) -> ConversionError {
    ConversionError::new(format!("'{}' is not a {} literal", text, desired))
}

impl OnDemandConverter for TextConverter {
    fn can_convert(&self, value: &Value, _: usize, _: &ResultMetadata, desired: ValueType) -> bool {
        self.attempt(value, desired).is_ok()
    }

    fn convert(
        &self,
        value: &Value,
        _: usize,
        _: &ResultMetadata,
        desired: ValueType,
    ) -> Result<Value, ConversionError> {
        self.attempt(value, desired)
    }
}
