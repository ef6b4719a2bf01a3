//! FILENAME: tabular-convert/src/numeric.rs
//! PURPOSE: Widening and narrowing between numeric kinds.
//! CONTEXT: Narrowing is only allowed when the value fits the target range
//! exactly; a fractional value never narrows to an integral kind.

use num_traits::ToPrimitive;

use tabular_engine::{ConversionError, OnDemandConverter, ResultMetadata, Value, ValueType};

#[derive(Debug, Clone, Copy, Default)]
pub struct NumericConverter;

impl NumericConverter {
    pub fn new() -> Self {
        NumericConverter
    }

    fn attempt(&self, value: &Value, desired: ValueType) -> Result<Value, ConversionError> {
        if !value.kind().map_or(false, |kind| kind.is_numeric()) {
            return Err(ConversionError::unsupported(value, desired));
        }

        let converted = match desired {
            ValueType::Any | ValueType::Number => value.clone(),
            ValueType::Byte => Value::Byte(narrow(value, desired)?),
            ValueType::Short => Value::Short(narrow(value, desired)?),
            ValueType::Int => Value::Int(narrow(value, desired)?),
            ValueType::Long => Value::Long(whole_number(value, desired)?),
            ValueType::Float => Value::Float(to_f32(value, desired)?),
            ValueType::Double => Value::Double(
                value
                    .as_f64()
                    .ok_or_else(|| ConversionError::unsupported(value, desired))?,
            ),
            ValueType::Decimal => Value::Decimal(value.to_decimal().ok_or_else(|| {
                ConversionError::new(format!("{} has no decimal form", value.display_value()))
            })?),
            ValueType::Text => Value::Text(value.display_value()),
            _ => return Err(ConversionError::unsupported(value, desired)),
        };
        Ok(converted)
    }
}

/// The value as an exact i64, refusing fractions and out-of-range values.
fn whole_number(value: &Value, desired: ValueType) -> Result<i64, ConversionError> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }

    let out_of_range = || {
        ConversionError::new(format!(
            "{} is not representable as {}",
            value.display_value(),
            desired
        ))
    };

    match value {
        Value::Float(_) | Value::Double(_) => {
            let n = value.as_f64().ok_or_else(out_of_range)?;
            if !n.is_finite() || n.fract() != 0.0 {
                return Err(out_of_range());
            }
            n.to_i64().ok_or_else(out_of_range)
        }
        Value::Decimal(d) => {
            if !d.is_integer() {
                return Err(out_of_range());
            }
            d.to_i64().ok_or_else(out_of_range)
        }
        _ => Err(ConversionError::unsupported(value, desired)),
    }
}

fn narrow<T: TryFrom<i64>>(value: &Value, desired: ValueType) -> Result<T, ConversionError> {
    let n = whole_number(value, desired)?;
    T::try_from(n).map_err(|_| ConversionError::new(format!("{} is out of range for {}", n, desired)))
}

fn to_f32(value: &Value, desired: ValueType) -> Result<f32, ConversionError> {
    if let Value::Float(n) = value {
        return Ok(*n);
    }
    let n = value
        .as_f64()
        .ok_or_else(|| ConversionError::unsupported(value, desired))?;
    if n.is_finite() && n.abs() > f64::from(f32::MAX) {
        return Err(ConversionError::new(format!("{} is out of range for {}", n, desired)));
    }
    Ok(n as f32)
}

impl OnDemandConverter for NumericConverter {
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

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;
    use tabular_engine::ColumnMeta;

    fn md() -> ResultMetadata {
        ResultMetadata::new(vec![ColumnMeta::new("n", Some("TINYINT"), 1)]).unwrap()
    }

    fn can(value: Value, desired: ValueType) -> bool {
        NumericConverter::new().can_convert(&value, 1, &md(), desired)
    }

    fn convert(value: Value, desired: ValueType) -> Result<Value, ConversionError> {
        NumericConverter::new().convert(&value, 1, &md(), desired)
    }

    #[test]
    fn test_refuses_null_and_text_sources() {
        assert!(!can(Value::Null, ValueType::Int));
        assert!(!can(Value::from("12"), ValueType::Int));
        assert!(!can(Value::Boolean(true), ValueType::Int));
    }

    #[test]
    fn test_byte_widens_everywhere() {
        for desired in [
            ValueType::Any,
            ValueType::Number,
            ValueType::Short,
            ValueType::Int,
            ValueType::Long,
            ValueType::Float,
            ValueType::Double,
            ValueType::Decimal,
            ValueType::Text,
        ] {
            assert!(can(Value::Byte(7), desired), "byte -> {}", desired);
        }
        assert_eq!(convert(Value::Byte(-3), ValueType::Long).unwrap(), Value::Long(-3));
        assert_eq!(convert(Value::Byte(7), ValueType::Text).unwrap(), Value::from("7"));
    }

    #[test]
    fn test_refuses_non_numeric_targets() {
        assert!(!can(Value::Byte(1), ValueType::Boolean));
        assert!(!can(Value::Int(1), ValueType::Date));
        assert!(!can(Value::Int(1), ValueType::Binary));
    }

    #[test]
    fn test_narrowing_checks_range() {
        assert_eq!(convert(Value::Long(100), ValueType::Byte).unwrap(), Value::Byte(100));
        assert!(!can(Value::Long(300), ValueType::Byte));
        assert!(!can(Value::Int(40_000), ValueType::Short));
        assert!(!can(Value::Long(i64::MAX), ValueType::Int));
    }

    #[test]
    fn test_fractions_never_narrow() {
        assert_eq!(convert(Value::Double(4.0), ValueType::Int).unwrap(), Value::Int(4));
        assert!(!can(Value::Double(4.5), ValueType::Int));
        assert!(!can(Value::Double(f64::NAN), ValueType::Long));

        let whole = BigDecimal::from_str("12.000").unwrap();
        let fraction = BigDecimal::from_str("12.5").unwrap();
        assert_eq!(convert(Value::Decimal(whole), ValueType::Long).unwrap(), Value::Long(12));
        assert!(!can(Value::Decimal(fraction), ValueType::Long));
    }

    #[test]
    fn test_float_range() {
        assert!(!can(Value::Double(1e300), ValueType::Float));
        assert_eq!(convert(Value::Int(2), ValueType::Float).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_decimal_from_double() {
        let d = convert(Value::Double(0.5), ValueType::Decimal).unwrap();
        assert_eq!(d, Value::Decimal(BigDecimal::from_str("0.5").unwrap()));
        assert!(!can(Value::Double(f64::INFINITY), ValueType::Decimal));
    }
}
