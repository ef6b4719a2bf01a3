//! FILENAME: tabular-engine/tests/common/mod.rs
//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tabular_engine::{
    ColumnConverter, ColumnMeta, ConversionError, ResultMetadata, Snapshot, TabularCache, Value,
};

/// A single INTEGER column.
pub fn int_column(values: &[i32]) -> Snapshot {
    let metadata = ResultMetadata::new(vec![ColumnMeta::new("n", Some("INTEGER"), 1)]).unwrap();
    Snapshot::new(
        metadata,
        values.iter().map(|&v| vec![Value::Int(v)]).collect(),
    )
}

/// id INTEGER, name VARCHAR, score VARCHAR (numbers stored as text).
pub fn people() -> Snapshot {
    let metadata = ResultMetadata::new(vec![
        ColumnMeta::new("id", Some("INTEGER"), 1).with_label("Id"),
        ColumnMeta::new("name", Some("VARCHAR"), 2).with_label("Name"),
        ColumnMeta::new("score", Some("SCORE"), 3).with_label("Score"),
    ])
    .unwrap();

    let rows = [
        (4, "dana", "7"),
        (2, "bob", "9"),
        (5, "erin", "7"),
        (1, "alice", "3"),
        (3, "carl", "9"),
    ];

    Snapshot::new(
        metadata,
        rows.iter()
            .map(|(id, name, score)| vec![Value::Int(*id), Value::from(*name), Value::from(*score)])
            .collect(),
    )
}

pub fn load(snapshot: Snapshot) -> TabularCache {
    TabularCache::from_snapshot(snapshot).unwrap()
}

/// Text -> Long; leaves every other value alone (idempotent on its output).
pub fn text_to_long() -> Arc<dyn ColumnConverter> {
    Arc::new(
        |value: &Value, _: usize, _: &ResultMetadata| -> Result<Value, ConversionError> {
            match value {
                Value::Text(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Long)
                    .map_err(|e| ConversionError::new(format!("'{}': {}", s, e))),
                other => Ok(other.clone()),
            }
        },
    )
}

/// Collects column `column` of every row, in cursor order.
pub fn column_values(cache: &mut TabularCache, column: usize) -> Vec<Value> {
    cache.before_first();
    let mut values = Vec::new();
    while cache.next() {
        values.push(cache.get_object(column).unwrap().unwrap());
    }
    values
}
