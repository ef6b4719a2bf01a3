//! FILENAME: tabular-engine/src/metadata.rs
//! PURPOSE: Immutable per-column descriptors captured once from the source.
//! CONTEXT: All column indices here are 1-based. Out-of-range lookups return
//! `None` (or `0` from `find_column`) rather than failing, so that row
//! accessors can tell "no such column" apart from cursor misuse.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Describes one column of the cached table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name as reported by the source.
    pub name: String,
    /// Display label; name-based accessors match against this.
    pub label: String,
    /// Source type name (e.g. "VARCHAR"). Bulk mapping is keyed on it.
    #[serde(default)]
    pub type_name: Option<String>,
    /// 1-based position of the column.
    pub ordinal: usize,
}

impl ColumnMeta {
    /// A column whose label equals its name.
    pub fn new(name: impl Into<String>, type_name: Option<&str>, ordinal: usize) -> Self {
        let name = name.into();
        ColumnMeta {
            label: name.clone(),
            name,
            type_name: type_name.map(str::to_string),
            ordinal,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Ordered, immutable column metadata for a cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnMeta>", into = "Vec<ColumnMeta>")]
pub struct ResultMetadata {
    columns: Vec<ColumnMeta>,
    /// Label -> 1-based index of the first column carrying that label.
    label_to_index: FxHashMap<String, usize>,
}

impl ResultMetadata {
    /// Builds metadata from columns given in ordinal order.
    /// Fails when ordinals are not exactly `1..=n`.
    pub fn new(columns: Vec<ColumnMeta>) -> Result<Self> {
        for (i, column) in columns.iter().enumerate() {
            if column.ordinal != i + 1 {
                return Err(CacheError::IllegalArgument(format!(
                    "column '{}' has ordinal {}, expected {}",
                    column.name,
                    column.ordinal,
                    i + 1
                )));
            }
        }

        let mut label_to_index = FxHashMap::default();
        for column in &columns {
            label_to_index
                .entry(column.label.clone())
                .or_insert(column.ordinal);
        }

        Ok(ResultMetadata {
            columns,
            label_to_index,
        })
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_valid_column(&self, column: usize) -> bool {
        column >= 1 && column <= self.columns.len()
    }

    pub fn column(&self, column: usize) -> Option<&ColumnMeta> {
        if self.is_valid_column(column) {
            self.columns.get(column - 1)
        } else {
            None
        }
    }

    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.column(column).map(|c| c.name.as_str())
    }

    pub fn column_label(&self, column: usize) -> Option<&str> {
        self.column(column).map(|c| c.label.as_str())
    }

    pub fn column_type_name(&self, column: usize) -> Option<&str> {
        self.column(column).and_then(|c| c.type_name.as_deref())
    }

    /// 1-based index of the first column whose label equals `label`,
    /// or 0 when there is none.
    pub fn find_column(&self, label: &str) -> usize {
        self.label_to_index.get(label).copied().unwrap_or(0)
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }
}

impl TryFrom<Vec<ColumnMeta>> for ResultMetadata {
    type Error = CacheError;

    fn try_from(columns: Vec<ColumnMeta>) -> Result<Self> {
        ResultMetadata::new(columns)
    }
}

impl From<ResultMetadata> for Vec<ColumnMeta> {
    fn from(metadata: ResultMetadata) -> Self {
        metadata.columns
    }
}
