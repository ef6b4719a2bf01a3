//! FILENAME: tabular-engine/src/cell.rs
//! PURPOSE: Defines the storage unit for one row/column intersection.
//! CONTEXT: A `Cell` keeps the value exactly as it came from the source
//! next to a mapped value that bulk remapping may rewrite. Keeping both in
//! one struct (instead of two parallel row lists) means they can never get
//! out of step when rows are sorted.

use serde::{Deserialize, Serialize};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// The value as loaded. Never changes after construction.
    original: Value,
    /// The value after bulk remapping. Starts equal to `original`.
    mapped: Value,
}

impl Cell {
    pub fn new(value: Value) -> Self {
        Cell {
            original: value.clone(),
            mapped: value,
        }
    }

    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn mapped(&self) -> &Value {
        &self.mapped
    }

    /// Only the bulk mapper rewrites mapped values.
    pub(crate) fn set_mapped(&mut self, value: Value) {
        self.mapped = value;
    }

    /// True when remapping produced something other than the loaded value.
    pub fn is_remapped(&self) -> bool {
        self.original != self.mapped
    }
}

/// One materialized row; its length always equals the column count.
pub type Row = Vec<Cell>;
