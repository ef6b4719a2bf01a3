//! FILENAME: tabular-convert/src/boolean.rs
//! PURPOSE: Booleans as text or as 1/0 integers.

use tabular_engine::{ConversionError, OnDemandConverter, ResultMetadata, Value, ValueType};

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl BooleanConverter {
    pub fn new() -> Self {
        BooleanConverter
    }

    fn attempt(&self, value: &Value, desired: ValueType) -> Result<Value, ConversionError> {
        let Value::Boolean(b) = *value else {
            return Err(ConversionError::unsupported(value, desired));
        };
        let n = i8::from(b);

        let converted = match desired {
            ValueType::Any | ValueType::Boolean => Value::Boolean(b),
            ValueType::Text => Value::Text(b.to_string()),
            ValueType::Byte => Value::Byte(n),
            ValueType::Short => Value::Short(i16::from(n)),
            ValueType::Int => Value::Int(i32::from(n)),
            ValueType::Long => Value::Long(i64::from(n)),
            _ => return Err(ConversionError::unsupported(value, desired)),
        };
        Ok(converted)
    }
}

impl OnDemandConverter for BooleanConverter {
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
