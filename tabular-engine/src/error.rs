//! FILENAME: tabular-engine/src/error.rs

use thiserror::Error;
use crate::value::{Value, ValueType};

/// Error produced by a converter that was asked for something it cannot do.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        ConversionError {
            message: message.into(),
        }
    }

    /// The converter does not handle this value/type combination.
    pub fn unsupported(value: &Value, desired: ValueType) -> Self {
        let source = value.kind().map_or("null", |kind| kind.name());
        ConversionError::new(format!("cannot convert {} value to {}", source, desired))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug)]
pub enum CacheError {
    /// A row accessor was called while the cursor is not on a row.
    #[error("invalid cursor state: current row {row} is outside 1..={record_count}")]
    InvalidCursorState { row: usize, record_count: usize },

    /// No resolution path produced the requested type.
    #[error("cannot read column {column} as {desired}: {reason}")]
    TypeConversion {
        column: usize,
        desired: ValueType,
        reason: String,
    },

    /// A bulk remap conversion failed. Cells mapped before the failure keep
    /// their new values.
    #[error("mapping failed for column {column} at row {row}: {source}")]
    Mapping {
        column: usize,
        row: usize,
        #[source]
        source: ConversionError,
    },

    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// The data source failed while the cache was being built.
    #[error("data source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;
