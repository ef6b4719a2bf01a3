//! FILENAME: tabular-convert/src/coerce.rs
//! PURPOSE: Bulk coercion of a column to one target type.
//! CONTEXT: Adapts an on-demand converter into a column converter for the
//! bulk mapper. Nulls and values already of the target type pass through
//! unchanged, so coercing an already-coerced column is a no-op.

use std::fmt;
use std::sync::Arc;

use tabular_engine::{
    ColumnConverter, ConversionError, OnDemandConverter, ResultMetadata, Value, ValueType,
};

#[derive(Clone)]
pub struct CoerceColumn {
    converter: Arc<dyn OnDemandConverter>,
    target: ValueType,
}

impl CoerceColumn {
    pub fn new(converter: Arc<dyn OnDemandConverter>, target: ValueType) -> Self {
        CoerceColumn { converter, target }
    }

    pub fn target(&self) -> ValueType {
        self.target
    }
}

impl ColumnConverter for CoerceColumn {
    fn convert(
        &self,
        value: &Value,
        column: usize,
        metadata: &ResultMetadata,
    ) -> Result<Value, ConversionError> {
        if value.is_null() || value.is_instance_of(self.target) {
            return Ok(value.clone());
        }
        if !self.converter.can_convert(value, column, metadata, self.target) {
            return Err(ConversionError::unsupported(value, self.target));
        }
        self.converter.convert(value, column, metadata, self.target)
    }
}

impl fmt::Debug for CoerceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoerceColumn")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::on_demand_mapper::OnDemandMapper;
    use tabular_engine::ColumnMeta;

    fn coerce(target: ValueType) -> CoerceColumn {
        CoerceColumn::new(Arc::new(OnDemandMapper::standard()), target)
    }

    #[test]
    fn test_coerces_text_column() {
        let md = ResultMetadata::new(vec![ColumnMeta::new("qty", Some("VARCHAR"), 1)]).unwrap();
        let c = coerce(ValueType::Long);
        assert_eq!(c.convert(&Value::from(" 12"), 1, &md).unwrap(), Value::Long(12));
        assert_eq!(c.convert(&Value::Null, 1, &md).unwrap(), Value::Null);
        assert!(c.convert(&Value::from("n/a"), 1, &md).is_err());
    }

    #[test]
    fn test_idempotent_on_its_output() {
        let md = ResultMetadata::new(vec![ColumnMeta::new("qty", Some("VARCHAR"), 1)]).unwrap();
        let c = coerce(ValueType::Int);
        let once = c.convert(&Value::from("7"), 1, &md).unwrap();
        let twice = c.convert(&once, 1, &md).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice, Value::Int(7));
    }
}
