//! FILENAME: tabular-engine/src/access.rs
//! PURPOSE: Typed access to the current row.
//! CONTEXT: A typed read walks `RESOLUTION_ORDER` and stops at the first
//! step that applies:
//! 1. the mapped value, if it is null or already of the requested type
//! 2. the original value, if it is null or already of the requested type
//! 3. the on-demand converter applied to the original value
//! 4. the on-demand converter applied to the mapped value
//! If no step applies the read fails with `TypeConversion`.
//! The order is part of the contract and is tested directly.

use log::trace;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::cache::TabularCache;
use crate::cell::Cell;
use crate::convert::OnDemandConverter;
use crate::error::{CacheError, Result};
use crate::value::{Value, ValueType};

/// One step of the typed-access cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    MappedAsIs,
    OriginalAsIs,
    ConvertOriginal,
    ConvertMapped,
}

/// The order in which typed access tries each step.
pub const RESOLUTION_ORDER: [ResolutionStep; 4] = [
    ResolutionStep::MappedAsIs,
    ResolutionStep::OriginalAsIs,
    ResolutionStep::ConvertOriginal,
    ResolutionStep::ConvertMapped,
];

/// What the winning step resolved to.
enum Resolution<'a> {
    Stored(&'a Value),
    Convert(&'a dyn OnDemandConverter, &'a Value),
}

fn satisfies(value: &Value, desired: ValueType) -> bool {
    value.is_null() || value.is_instance_of(desired)
}

impl TabularCache {
    /// Finds the first applicable step for `cell`. Only `can_convert` is
    /// called on the converter here.
    fn resolve<'a>(
        &'a self,
        cell: &'a Cell,
        column: usize,
        desired: ValueType,
    ) -> Option<(ResolutionStep, Resolution<'a>)> {
        for step in RESOLUTION_ORDER {
            let resolution = match step {
                ResolutionStep::MappedAsIs => {
                    satisfies(cell.mapped(), desired).then_some(Resolution::Stored(cell.mapped()))
                }
                ResolutionStep::OriginalAsIs => satisfies(cell.original(), desired)
                    .then_some(Resolution::Stored(cell.original())),
                ResolutionStep::ConvertOriginal => {
                    self.convertible(cell.original(), column, desired)
                }
                ResolutionStep::ConvertMapped => self.convertible(cell.mapped(), column, desired),
            };
            if let Some(resolution) = resolution {
                trace!("column {} as {} resolved by {:?}", column, desired, step);
                return Some((step, resolution));
            }
        }
        None
    }

    fn convertible<'a>(
        &'a self,
        value: &'a Value,
        column: usize,
        desired: ValueType,
    ) -> Option<Resolution<'a>> {
        let converter = self.on_demand.as_deref()?;
        converter
            .can_convert(value, column, &self.metadata, desired)
            .then_some(Resolution::Convert(converter, value))
    }

    /// Reads `column` of the current row as `desired`.
    ///
    /// `Ok(None)` means there is no such column. `Ok(Some(Value::Null))`
    /// means the stored value is null.
    pub fn get_typed(&self, column: usize, desired: ValueType) -> Result<Option<Value>> {
        let Some(cell) = self.current_cell(column)? else {
            return Ok(None);
        };

        match self.resolve(cell, column, desired) {
            Some((_, Resolution::Stored(value))) => Ok(Some(value.clone())),
            Some((step, Resolution::Convert(converter, value))) => converter
                .convert(value, column, &self.metadata, desired)
                .map(Some)
                .map_err(|err| CacheError::TypeConversion {
                    column,
                    desired,
                    reason: format!("{:?} failed: {}", step, err),
                }),
            None => Err(CacheError::TypeConversion {
                column,
                desired,
                reason: "no converter is found".to_string(),
            }),
        }
    }

    pub fn get_typed_by_name(&self, label: &str, desired: ValueType) -> Result<Option<Value>> {
        self.get_typed(self.find_column(label), desired)
    }

    /// Whether `get_typed(column, desired)` would find a resolution step.
    /// An unknown column answers `false`; a misplaced cursor is an error.
    pub fn is_available(&self, column: usize, desired: ValueType) -> Result<bool> {
        Ok(self.resolution_step(column, desired)?.is_some())
    }

    pub fn is_available_by_name(&self, label: &str, desired: ValueType) -> Result<bool> {
        self.is_available(self.find_column(label), desired)
    }

    /// The step `get_typed` would use, without converting anything.
    pub fn resolution_step(
        &self,
        column: usize,
        desired: ValueType,
    ) -> Result<Option<ResolutionStep>> {
        let Some(cell) = self.current_cell(column)? else {
            return Ok(None);
        };
        Ok(self.resolve(cell, column, desired).map(|(step, _)| step))
    }
}

// ============================================================================
// TYPED CONVENIENCE GETTERS
// ============================================================================

macro_rules! typed_getter {
    ($($name:ident, $by_name:ident, $variant:ident => $ty:ty;)*) => {
        impl TabularCache {
            $(
                #[doc = concat!("Reads a column as `ValueType::", stringify!($variant), "`. `None` for a null value or an unknown column.")]
                pub fn $name(&self, column: usize) -> Result<Option<$ty>> {
                    match self.get_typed(column, ValueType::$variant)? {
                        None | Some(Value::Null) => Ok(None),
                        Some(Value::$variant(v)) => Ok(Some(v)),
                        Some(other) => Err(CacheError::TypeConversion {
                            column,
                            desired: ValueType::$variant,
                            reason: format!(
                                "converter produced a {} value",
                                other.kind().map_or("null", |k| k.name())
                            ),
                        }),
                    }
                }

                pub fn $by_name(&self, label: &str) -> Result<Option<$ty>> {
                    self.$name(self.find_column(label))
                }
            )*
        }
    };
}

typed_getter! {
    get_boolean, get_boolean_by_name, Boolean => bool;
    get_byte, get_byte_by_name, Byte => i8;
    get_short, get_short_by_name, Short => i16;
    get_int, get_int_by_name, Int => i32;
    get_long, get_long_by_name, Long => i64;
    get_float, get_float_by_name, Float => f32;
    get_double, get_double_by_name, Double => f64;
    get_decimal, get_decimal_by_name, Decimal => BigDecimal;
    get_string, get_string_by_name, Text => String;
    get_bytes, get_bytes_by_name, Binary => Vec<u8>;
    get_date, get_date_by_name, Date => NaiveDate;
    get_time, get_time_by_name, Time => NaiveTime;
    get_timestamp, get_timestamp_by_name, Timestamp => NaiveDateTime;
}
