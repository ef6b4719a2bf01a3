//! FILENAME: tabular-engine/src/convert.rs
//! PURPOSE: Converter contracts used by the cache.
//! CONTEXT: Two capabilities live here:
//! - `ColumnConverter`: applied eagerly by the bulk mapper to every cell of
//!   a column, replacing its mapped value.
//! - `OnDemandConverter`: queried lazily by typed access when neither stored
//!   value already satisfies the requested type.
//! The only on-demand implementation in this crate is `PassThroughConverter`;
//! richer ones live in `tabular-convert`.

use crate::error::ConversionError;
use crate::metadata::ResultMetadata;
use crate::value::{Value, ValueType};

/// Column-wide conversion applied during remapping.
pub trait ColumnConverter: Send + Sync {
    fn convert(
        &self,
        value: &Value,
        column: usize,
        metadata: &ResultMetadata,
    ) -> Result<Value, ConversionError>;
}

impl<F> ColumnConverter for F
where
    F: Fn(&Value, usize, &ResultMetadata) -> Result<Value, ConversionError> + Send + Sync,
{
    fn convert(
        &self,
        value: &Value,
        column: usize,
        metadata: &ResultMetadata,
    ) -> Result<Value, ConversionError> {
        self(value, column, metadata)
    }
}

/// Per-access conversion capability.
///
/// `can_convert` must be side-effect free; the cache calls it before
/// `convert` and during availability checks.
pub trait OnDemandConverter: Send + Sync {
    fn can_convert(
        &self,
        value: &Value,
        column: usize,
        metadata: &ResultMetadata,
        desired: ValueType,
    ) -> bool;

    fn convert(
        &self,
        value: &Value,
        column: usize,
        metadata: &ResultMetadata,
        desired: ValueType,
    ) -> Result<Value, ConversionError>;
}

/// The default on-demand converter: never converts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughConverter;

impl OnDemandConverter for PassThroughConverter {
    fn can_convert(&self, _: &Value, _: usize, _: &ResultMetadata, _: ValueType) -> bool {
        false
    }

    fn convert(
        &self,
        value: &Value,
        _: usize,
        _: &ResultMetadata,
        desired: ValueType,
    ) -> Result<Value, ConversionError> {
        Err(ConversionError::unsupported(value, desired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ColumnMeta;

    fn metadata() -> ResultMetadata {
        ResultMetadata::new(vec![ColumnMeta::new("c", Some("VARCHAR"), 1)]).unwrap()
    }

    #[test]
    fn test_pass_through_never_converts() {
        let md = metadata();
        let converter = PassThroughConverter;
        for desired in [ValueType::Any, ValueType::Text, ValueType::Int] {
            assert!(!converter.can_convert(&Value::from("5"), 1, &md, desired));
            assert!(converter.convert(&Value::from("5"), 1, &md, desired).is_err());
        }
    }

    #[test]
    fn test_closure_is_a_column_converter() {
        let md = metadata();
        let upper = |value: &Value, _: usize, _: &ResultMetadata| -> Result<Value, ConversionError> {
            match value {
                Value::Text(s) => Ok(Value::Text(s.to_uppercase())),
                other => Ok(other.clone()),
            }
        };
        let converter: &dyn ColumnConverter = &upper;
        assert_eq!(
            converter.convert(&Value::from("abc"), 1, &md).unwrap(),
            Value::from("ABC")
        );
    }
}
