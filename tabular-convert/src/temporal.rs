//! FILENAME: tabular-convert/src/temporal.rs
//! PURPOSE: Conversions between dates, times and timestamps.
//! CONTEXT: A date widens to a timestamp at midnight; a timestamp narrows to
//! either its date or its time. Dates and times never convert into each
//! other.

use tabular_engine::{ConversionError, OnDemandConverter, ResultMetadata, Value, ValueType};

use crate::profile::FormatSettings;

#[derive(Debug, Clone, Default)]
pub struct TemporalConverter {
    formats: FormatSettings,
}

impl TemporalConverter {
    pub fn new(formats: FormatSettings) -> Self {
        TemporalConverter { formats }
    }

    fn attempt(&self, value: &Value, desired: ValueType) -> Result<Value, ConversionError> {
        let refuse = || ConversionError::unsupported(value, desired);

        let converted = match (value, desired) {
            (Value::Date(_) | Value::Time(_) | Value::Timestamp(_), ValueType::Any | ValueType::Temporal) => {
                value.clone()
            }

            (Value::Date(_), ValueType::Date) => value.clone(),
            (Value::Timestamp(ts), ValueType::Date) => Value::Date(ts.date()),

            (Value::Time(_), ValueType::Time) => value.clone(),
            (Value::Timestamp(ts), ValueType::Time) => Value::Time(ts.time()),

            (Value::Timestamp(_), ValueType::Timestamp) => value.clone(),
            (Value::Date(d), ValueType::Timestamp) => {
                Value::Timestamp(d.and_hms_opt(0, 0, 0).ok_or_else(refuse)?)
            }

            (Value::Date(d), ValueType::Text) => Value::Text(match self.formats.date_formats.first() {
                Some(f) => d.format(f).to_string(),
                None => d.to_string(),
            }),
            (Value::Time(t), ValueType::Text) => Value::Text(match self.formats.time_formats.first() {
                Some(f) => t.format(f).to_string(),
                None => t.to_string(),
            }),
            (Value::Timestamp(ts), ValueType::Text) => {
                Value::Text(match self.formats.timestamp_formats.first() {
                    Some(f) => ts.format(f).to_string(),
                    None => ts.to_string(),
                })
            }

            _ => return Err(refuse()),
        };
        Ok(converted)
    }
}

impl OnDemandConverter for TemporalConverter {
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
