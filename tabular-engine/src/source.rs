//! FILENAME: tabular-engine/src/source.rs
//! PURPOSE: The boundary to whatever produces the rows.
//! CONTEXT: The cache pulls column metadata once and then every row, in
//! order, exactly once. It never goes back to the source afterwards.
//! `Snapshot` is the in-memory source used when rows are already
//! materialized (tests, fixtures, JSON documents).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metadata::ResultMetadata;
use crate::value::Value;

/// A forward-only producer of column metadata and rows.
pub trait TabularSource {
    /// Column descriptors in ordinal order.
    fn metadata(&self) -> Result<ResultMetadata>;

    /// The next row, one value per column in ordinal order, or `None` once
    /// the source is exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<Value>>>;
}

/// Fully materialized rows plus their metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub columns: ResultMetadata,
    pub rows: Vec<Vec<Value>>,
    /// Rows already handed out through `next_row`.
    #[serde(skip)]
    consumed: usize,
}

impl Snapshot {
    pub fn new(columns: ResultMetadata, rows: Vec<Vec<Value>>) -> Self {
        Snapshot {
            columns,
            rows,
            consumed: 0,
        }
    }
}

impl TabularSource for Snapshot {
    fn metadata(&self) -> Result<ResultMetadata> {
        Ok(self.columns.clone())
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        let row = self.rows.get_mut(self.consumed).map(std::mem::take);
        if row.is_some() {
            self.consumed += 1;
        }
        Ok(row)
    }
}
