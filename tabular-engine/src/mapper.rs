//! Bulk mapping - column-type-keyed conversion applied to every row.
//!
//! A `Mapper` is a table from lower-cased source type name to a
//! `ColumnConverter`. Remapping walks the columns in order; for each column
//! whose type name has a converter it rewrites the mapped value of every
//! row. Original values are never touched.
//!
//! Failure policy: the first conversion error aborts the pass. Cells already
//! rewritten (earlier rows of the failing column and all earlier columns)
//! keep their new values; nothing is rolled back.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::cell::Row;
use crate::convert::ColumnConverter;
use crate::error::{CacheError, Result};
use crate::metadata::ResultMetadata;

#[derive(Clone, Default)]
pub struct Mapper {
    converters: FxHashMap<String, Arc<dyn ColumnConverter>>,
}

impl Mapper {
    pub fn new() -> Self {
        Mapper::default()
    }

    /// Registers `converter` for `type_name` (case-insensitive).
    /// Returns the converter previously registered for that name, if any.
    pub fn register(
        &mut self,
        type_name: &str,
        converter: Arc<dyn ColumnConverter>,
    ) -> Option<Arc<dyn ColumnConverter>> {
        self.converters.insert(type_name.to_lowercase(), converter)
    }

    /// Chaining form of `register`.
    pub fn with(mut self, type_name: &str, converter: Arc<dyn ColumnConverter>) -> Self {
        self.register(type_name, converter);
        self
    }

    pub fn converter_for(&self, type_name: &str) -> Option<&dyn ColumnConverter> {
        self.converters
            .get(&type_name.to_lowercase())
            .map(|c| c.as_ref())
    }

    /// Registered (lower-cased) type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("type_names", &self.type_names())
            .finish()
    }
}

/// Applies `mapper` to `rows` in place. Returns the 1-based indices of the
/// columns that had a converter.
pub(crate) fn remap_rows(
    rows: &mut [Row],
    metadata: &ResultMetadata,
    mapper: &Mapper,
) -> Result<Vec<usize>> {
    let mut mapped_columns = Vec::new();

    for column in 1..=metadata.column_count() {
        let Some(type_name) = metadata.column_type_name(column) else {
            continue;
        };
        let Some(converter) = mapper.converter_for(type_name) else {
            continue;
        };

        for (row_index, row) in rows.iter_mut().enumerate() {
            let Some(cell) = row.get_mut(column - 1) else {
                continue;
            };
            match converter.convert(cell.mapped(), column, metadata) {
                Ok(converted) => cell.set_mapped(converted),
                Err(source) => {
                    warn!(
                        "remap aborted at column {} ({}), row {}: {}; earlier cells stay remapped",
                        column,
                        type_name,
                        row_index + 1,
                        source
                    );
                    return Err(CacheError::Mapping {
                        column,
                        row: row_index + 1,
                        source,
                    });
                }
            }
        }

        debug!("remapped column {} ({}) across {} rows", column, type_name, rows.len());
        mapped_columns.push(column);
    }

    Ok(mapped_columns)
}
