//! Tabular Cache - materialized rows behind a scrollable cursor.
//!
//! The cache is built once from a `TabularSource` and is purely in-memory
//! afterwards. It owns:
//! - the rows (reordered only by sorting)
//! - the cursor (reset to before-first by every sort)
//! - the column metadata (fixed at construction)
//! - an optional on-demand converter consulted by typed access
//!
//! Row and column counts never change after construction. Accessors hand
//! out clones, never references into the row storage.
//!
//! Typed access lives in `access.rs`.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::cell::{Cell, Row};
use crate::convert::{OnDemandConverter, PassThroughConverter};
use crate::cursor::Cursor;
use crate::error::{CacheError, Result};
use crate::mapper::{self, Mapper};
use crate::metadata::ResultMetadata;
use crate::sort::{self, ValueComparator};
use crate::source::{Snapshot, TabularSource};
use crate::value::Value;

pub struct TabularCache {
    pub(crate) rows: Vec<Row>,
    pub(crate) cursor: Cursor,
    pub(crate) metadata: ResultMetadata,
    pub(crate) on_demand: Option<Arc<dyn OnDemandConverter>>,
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl TabularCache {
    /// Loads every row of `source` with the pass-through on-demand converter
    /// and no bulk mapping.
    pub fn load<S: TabularSource + ?Sized>(source: &mut S) -> Result<Self> {
        Self::load_with(source, None, Some(Arc::new(PassThroughConverter)))
    }

    /// Loads every row of `source` and remaps it with `mapper`.
    pub fn load_with_mapper<S: TabularSource + ?Sized>(
        source: &mut S,
        mapper: Option<&Mapper>,
    ) -> Result<Self> {
        Self::load_with(source, mapper, Some(Arc::new(PassThroughConverter)))
    }

    /// Full form. A `None` converter disables on-demand conversion entirely.
    ///
    /// Loading is all-or-nothing: a source error or a row of the wrong width
    /// fails construction. A mapping failure also fails construction.
    pub fn load_with<S: TabularSource + ?Sized>(
        source: &mut S,
        mapper: Option<&Mapper>,
        on_demand: Option<Arc<dyn OnDemandConverter>>,
    ) -> Result<Self> {
        let metadata = source.metadata()?;
        let column_count = metadata.column_count();

        let mut rows: Vec<Row> = Vec::new();
        while let Some(values) = source.next_row()? {
            if values.len() != column_count {
                return Err(CacheError::IllegalArgument(format!(
                    "row {} has {} values, expected {}",
                    rows.len() + 1,
                    values.len(),
                    column_count
                )));
            }
            rows.push(values.into_iter().map(Cell::new).collect());
        }

        debug!("loaded {} rows x {} columns", rows.len(), column_count);

        let mut cache = TabularCache {
            rows,
            cursor: Cursor::default(),
            metadata,
            on_demand,
        };
        cache.remap(mapper)?;
        Ok(cache)
    }

    pub fn from_snapshot(mut snapshot: Snapshot) -> Result<Self> {
        Self::load(&mut snapshot)
    }
}

// ============================================================================
// CURSOR NAVIGATION
// ============================================================================

impl TabularCache {
    pub fn before_first(&mut self) {
        self.cursor.before_first();
    }

    pub fn after_last(&mut self) {
        self.cursor.after_last(self.rows.len());
    }

    pub fn first(&mut self) -> bool {
        self.cursor.first(self.rows.len())
    }

    pub fn last(&mut self) -> bool {
        self.cursor.last(self.rows.len())
    }

    pub fn next(&mut self) -> bool {
        self.cursor.next(self.rows.len())
    }

    pub fn previous(&mut self) -> bool {
        self.cursor.previous(self.rows.len())
    }

    /// Moves to a 1-based row; negative values count back from the end.
    pub fn absolute(&mut self, row: i64) -> bool {
        self.cursor.absolute(row, self.rows.len())
    }

    pub fn relative(&mut self, delta: i64) -> bool {
        self.cursor.relative(delta, self.rows.len())
    }

    pub fn is_before_first(&self) -> bool {
        self.cursor.is_before_first()
    }

    pub fn is_after_last(&self) -> bool {
        self.cursor.is_after_last(self.rows.len())
    }

    pub fn is_first(&self) -> bool {
        self.cursor.is_first(self.rows.len())
    }

    pub fn is_last(&self) -> bool {
        self.cursor.is_last(self.rows.len())
    }

    /// Current cursor position (0 = before-first, n + 1 = after-last).
    pub fn get_row(&self) -> usize {
        self.cursor.position()
    }
}

// ============================================================================
// SHAPE & UNTYPED ACCESS
// ============================================================================

impl TabularCache {
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.metadata.column_count()
    }

    pub fn metadata(&self) -> &ResultMetadata {
        &self.metadata
    }

    pub fn on_demand_converter(&self) -> Option<&dyn OnDemandConverter> {
        self.on_demand.as_deref()
    }

    /// 1-based index of the column labelled `label`, or 0.
    pub fn find_column(&self, label: &str) -> usize {
        self.metadata.find_column(label)
    }

    /// The row under the cursor, or `InvalidCursorState`.
    pub(crate) fn current_row(&self) -> Result<&Row> {
        let position = self.cursor.position();
        if !self.cursor.is_on_row(self.rows.len()) {
            return Err(CacheError::InvalidCursorState {
                row: position,
                record_count: self.rows.len(),
            });
        }
        self.rows
            .get(position - 1)
            .ok_or(CacheError::InvalidCursorState {
                row: position,
                record_count: self.rows.len(),
            })
    }

    /// The cell at `column` of the current row.
    ///
    /// An out-of-range column yields `Ok(None)` before the cursor is even
    /// looked at; only a valid column with a misplaced cursor is an error.
    pub(crate) fn current_cell(&self, column: usize) -> Result<Option<&Cell>> {
        if !self.metadata.is_valid_column(column) {
            return Ok(None);
        }
        Ok(self.current_row()?.get(column - 1))
    }

    /// The cell at `column` of the current row, checking the cursor first.
    /// Untyped reads use this order: a misplaced cursor is an error even
    /// for a column that does not exist.
    fn cell_on_row(&self, column: usize) -> Result<Option<&Cell>> {
        let row = self.current_row()?;
        if !self.metadata.is_valid_column(column) {
            return Ok(None);
        }
        Ok(row.get(column - 1))
    }

    /// Mapped value of `column` in the current row. Never falls back to the
    /// original value and never converts.
    ///
    /// Unlike `get_typed`, the cursor is validated before the column index.
    pub fn get_object(&self, column: usize) -> Result<Option<Value>> {
        Ok(self.cell_on_row(column)?.map(|cell| cell.mapped().clone()))
    }

    pub fn get_object_by_name(&self, label: &str) -> Result<Option<Value>> {
        self.get_object(self.find_column(label))
    }

    /// A copy of the whole cell (original and mapped value).
    pub fn get_cell(&self, column: usize) -> Result<Option<Cell>> {
        Ok(self.cell_on_row(column)?.cloned())
    }
}

// ============================================================================
// REMAP & SORT
// ============================================================================

impl TabularCache {
    /// Rewrites mapped values column by column. `None` is a no-op.
    ///
    /// The first failing cell aborts with `CacheError::Mapping`; cells
    /// already rewritten keep their new values.
    pub fn remap(&mut self, mapper: Option<&Mapper>) -> Result<()> {
        let Some(mapper) = mapper else {
            return Ok(());
        };
        let mapped = mapper::remap_rows(&mut self.rows, &self.metadata, mapper)?;
        debug!("remap touched columns {:?}", mapped);
        Ok(())
    }

    /// Stable multi-key sort on mapped values.
    ///
    /// `comparators`, when given, is read position by position alongside
    /// `columns`; a `None` entry means natural ordering for that key. It
    /// must be at least as long as `columns`.
    ///
    /// On success the cursor is reset to before-first. On failure rows and
    /// cursor are left as they were.
    pub fn sort_by(
        &mut self,
        columns: &[usize],
        comparators: Option<&[Option<&ValueComparator>]>,
        descending: bool,
    ) -> Result<()> {
        let keys = sort::build_keys(columns, comparators)?;
        let order = sort::sorted_permutation(&self.rows, &keys, descending).map_err(|err| {
            warn!("sort on columns {:?} aborted: {}", columns, err);
            err
        })?;
        sort::apply_permutation(&mut self.rows, &order);
        self.cursor.before_first();

        debug!(
            "sorted {} rows by columns {:?} ({})",
            self.rows.len(),
            columns,
            if descending { "descending" } else { "ascending" }
        );
        Ok(())
    }

    pub fn sort_ascending(&mut self, column: usize) -> Result<()> {
        self.sort_by(&[column], None, false)
    }

    pub fn sort_descending(&mut self, column: usize) -> Result<()> {
        self.sort_by(&[column], None, true)
    }

    pub fn sort_ascending_with(&mut self, column: usize, comparator: &ValueComparator) -> Result<()> {
        self.sort_by(&[column], Some(&[Some(comparator)]), false)
    }

    pub fn sort_descending_with(&mut self, column: usize, comparator: &ValueComparator) -> Result<()> {
        self.sort_by(&[column], Some(&[Some(comparator)]), true)
    }

    pub fn sort_ascending_by(&mut self, columns: &[usize]) -> Result<()> {
        self.sort_by(columns, None, false)
    }

    pub fn sort_descending_by(&mut self, columns: &[usize]) -> Result<()> {
        self.sort_by(columns, None, true)
    }

    pub fn sort_ascending_by_with(
        &mut self,
        columns: &[usize],
        comparators: &[Option<&ValueComparator>],
    ) -> Result<()> {
        self.sort_by(columns, Some(comparators), false)
    }

    pub fn sort_descending_by_with(
        &mut self,
        columns: &[usize],
        comparators: &[Option<&ValueComparator>],
    ) -> Result<()> {
        self.sort_by(columns, Some(comparators), true)
    }

    /// Name-based form of `sort_by`. Unknown labels resolve to column 0,
    /// which never decides.
    pub fn sort_by_names(
        &mut self,
        labels: &[&str],
        comparators: Option<&[Option<&ValueComparator>]>,
        descending: bool,
    ) -> Result<()> {
        let columns: Vec<usize> = labels.iter().map(|l| self.find_column(l)).collect();
        self.sort_by(&columns, comparators, descending)
    }

    pub fn sort_ascending_by_name(&mut self, label: &str) -> Result<()> {
        self.sort_by_names(&[label], None, false)
    }

    pub fn sort_descending_by_name(&mut self, label: &str) -> Result<()> {
        self.sort_by_names(&[label], None, true)
    }
}

impl fmt::Debug for TabularCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabularCache")
            .field("record_count", &self.rows.len())
            .field("column_count", &self.metadata.column_count())
            .field("cursor", &self.cursor.position())
            .field("on_demand", &self.on_demand.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ColumnMeta;
    use crate::value::ValueType;

    fn create_test_cache() -> TabularCache {
        let md = ResultMetadata::new(vec![
            ColumnMeta::new("id", Some("INTEGER"), 1),
            ColumnMeta::new("name", Some("VARCHAR"), 2).with_label("Name"),
        ])
        .unwrap();
        let rows = vec![
            vec![Value::Int(3), Value::from("carol")],
            vec![Value::Int(1), Value::from("alice")],
            vec![Value::Int(2), Value::from("bob")],
        ];
        TabularCache::from_snapshot(Snapshot::new(md, rows)).unwrap()
    }

    #[test]
    fn test_load_counts() {
        let cache = create_test_cache();
        assert_eq!(cache.record_count(), 3);
        assert_eq!(cache.column_count(), 2);
        assert!(cache.is_before_first());
        assert!(cache.on_demand_converter().is_some());
    }

    #[test]
    fn test_wrong_width_row_fails_load() {
        let md = ResultMetadata::new(vec![ColumnMeta::new("a", None, 1)]).unwrap();
        let snapshot = Snapshot::new(md, vec![vec![Value::Int(1), Value::Int(2)]]);
        let err = TabularCache::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, CacheError::IllegalArgument(_)));
    }

    #[test]
    fn test_sort_then_iterate() {
        let mut cache = create_test_cache();
        cache.sort_ascending(1).unwrap();
        let mut seen = Vec::new();
        for _ in 0..3 {
            assert!(cache.next());
            seen.push(cache.get_object(1).unwrap());
        }
        assert_eq!(
            seen,
            vec![Some(Value::Int(1)), Some(Value::Int(2)), Some(Value::Int(3))]
        );
        assert_eq!(cache.get_row(), 3);
    }

    #[test]
    fn test_sort_resets_cursor() {
        let mut cache = create_test_cache();
        cache.last();
        cache.sort_descending_by_name("Name").unwrap();
        assert!(cache.is_before_first());
        cache.first();
        assert_eq!(cache.get_object_by_name("Name").unwrap(), Some(Value::from("carol")));
    }

    #[test]
    fn test_accessor_before_first_fails() {
        let cache = create_test_cache();
        let err = cache.get_object(1).unwrap_err();
        assert!(matches!(err, CacheError::InvalidCursorState { row: 0, record_count: 3 }));
    }

    #[test]
    fn test_out_of_range_column_is_not_an_error() {
        let mut cache = create_test_cache();
        cache.first();
        assert_eq!(cache.get_object(0).unwrap(), None);
        assert_eq!(cache.get_object(3).unwrap(), None);
        assert_eq!(cache.get_object_by_name("missing").unwrap(), None);
    }

    #[test]
    fn test_untyped_read_checks_cursor_before_column() {
        let mut cache = create_test_cache();
        assert!(matches!(
            cache.get_object(0),
            Err(CacheError::InvalidCursorState { row: 0, .. })
        ));
        assert!(matches!(
            cache.get_cell(7),
            Err(CacheError::InvalidCursorState { row: 0, .. })
        ));
        assert!(matches!(
            cache.get_object_by_name("missing"),
            Err(CacheError::InvalidCursorState { .. })
        ));

        // Typed access answers "no value" for the same column.
        assert_eq!(cache.get_typed(0, ValueType::Int).unwrap(), None);

        cache.after_last();
        assert!(matches!(
            cache.get_object(0),
            Err(CacheError::InvalidCursorState { row: 4, record_count: 3 })
        ));
    }

    #[test]
    fn test_remap_none_is_noop() {
        let mut cache = create_test_cache();
        cache.remap(None).unwrap();
        cache.first();
        let cell = cache.get_cell(2).unwrap().unwrap();
        assert!(!cell.is_remapped());
    }
}
