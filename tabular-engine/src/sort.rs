//! Multi-key row sorting.
//!
//! Rows are compared key by key on their mapped values. A key whose column
//! index is out of range, or where either value is null, never decides; the
//! comparison falls through to the next key. Descending order swaps the pair
//! before comparing rather than reversing the result, so keys that cannot
//! decide stay neutral in both directions.
//!
//! The order is computed on a permutation of row indices with a stable
//! merge sort that tolerates the neutral keys above. Rows are only
//! rearranged once every comparison has succeeded.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::cell::Row;
use crate::error::{CacheError, Result};
use crate::value::{Value, ValueType};

/// Caller-supplied ordering for one sort key.
pub type ValueComparator = dyn Fn(&Value, &Value) -> Ordering;

/// One resolved sort key: a 1-based column and an optional comparator
/// (natural ordering when `None`).
#[derive(Clone, Copy)]
pub struct SortKey<'a> {
    pub column: usize,
    pub comparator: Option<&'a ValueComparator>,
}

pub(crate) type SortKeys<'a> = SmallVec<[SortKey<'a>; 4]>;

/// Pairs each column with the comparator at the same position.
///
/// When comparators are given there must be at least one per column; the
/// error names the first position that has none.
pub(crate) fn build_keys<'a>(
    columns: &[usize],
    comparators: Option<&[Option<&'a ValueComparator>]>,
) -> Result<SortKeys<'a>> {
    if let Some(comparators) = comparators {
        if comparators.len() < columns.len() {
            return Err(CacheError::IllegalArgument(format!(
                "no comparator at sort position {} ({} supplied for {} sort columns)",
                comparators.len(),
                comparators.len(),
                columns.len()
            )));
        }
    }

    Ok(columns
        .iter()
        .enumerate()
        .map(|(i, &column)| SortKey {
            column,
            comparator: comparators.and_then(|c| c[i]),
        })
        .collect())
}

/// Compares two rows under `keys` in ascending sense.
fn compare_rows(a: &Row, b: &Row, keys: &[SortKey<'_>]) -> Result<Ordering> {
    for key in keys {
        if key.column < 1 {
            continue;
        }
        let (Some(ca), Some(cb)) = (a.get(key.column - 1), b.get(key.column - 1)) else {
            continue;
        };
        let (va, vb) = (ca.mapped(), cb.mapped());
        if va.is_null() || vb.is_null() {
            continue;
        }

        let ordering = match key.comparator {
            Some(comparator) => comparator(va, vb),
            None => va.natural_cmp(vb).ok_or_else(|| CacheError::TypeConversion {
                column: key.column,
                desired: ValueType::Any,
                reason: format!(
                    "values '{}' and '{}' have no natural ordering",
                    va.display_value(),
                    vb.display_value()
                ),
            })?,
        };

        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(Ordering::Equal)
}

/// Stable sorted order of `rows` as a permutation of their indices.
pub(crate) fn sorted_permutation(
    rows: &[Row],
    keys: &[SortKey<'_>],
    descending: bool,
) -> Result<Vec<usize>> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    merge_sort(&mut order, |i, j| {
        if descending {
            compare_rows(&rows[j], &rows[i], keys)
        } else {
            compare_rows(&rows[i], &rows[j], keys)
        }
    })?;
    Ok(order)
}

/// Bottom-up stable merge sort over `order`.
///
/// Null and out-of-range keys compare equal to everything, so the row
/// ordering is not transitive. Each merge step only asks whether the right
/// element strictly precedes the left one, which keeps every index exactly
/// once and terminates for any comparison results. The first comparison
/// error stops the sort and leaves `order` partially merged.
fn merge_sort<F>(order: &mut Vec<usize>, mut compare: F) -> Result<()>
where
    F: FnMut(usize, usize) -> Result<Ordering>,
{
    let len = order.len();
    let mut merged: Vec<usize> = Vec::with_capacity(len);
    let mut width = 1;

    while width < len {
        merged.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right) = (start, mid);

            while left < mid && right < end {
                if compare(order[right], order[left])? == Ordering::Less {
                    merged.push(order[right]);
                    right += 1;
                } else {
                    merged.push(order[left]);
                    left += 1;
                }
            }
            merged.extend_from_slice(&order[left..mid]);
            merged.extend_from_slice(&order[right..end]);
            start = end;
        }
        std::mem::swap(order, &mut merged);
        width *= 2;
    }
    Ok(())
}

/// Rearranges `rows` so that position `k` holds the row previously at
/// `order[k]`.
pub(crate) fn apply_permutation(rows: &mut Vec<Row>, order: &[usize]) {
    let mut slots: Vec<Option<Row>> = std::mem::take(rows).into_iter().map(Some).collect();
    *rows = order.iter().filter_map(|&i| slots[i].take()).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn rows(values: &[(i32, &str)]) -> Vec<Row> {
        values
            .iter()
            .map(|(n, s)| vec![Cell::new(Value::Int(*n)), Cell::new(Value::from(*s))])
            .collect()
    }

    fn firsts(rows: &[Row]) -> Vec<Value> {
        rows.iter().map(|r| r[0].mapped().clone()).collect()
    }

    fn sort(rows: &mut Vec<Row>, columns: &[usize], descending: bool) -> Result<()> {
        let keys = build_keys(columns, None)?;
        let order = sorted_permutation(rows, &keys, descending)?;
        apply_permutation(rows, &order);
        Ok(())
    }

    #[test]
    fn test_single_key_ascending() {
        let mut data = rows(&[(3, "c"), (1, "a"), (2, "b")]);
        sort(&mut data, &[1], false).unwrap();
        assert_eq!(firsts(&data), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_ties_fall_through_to_next_key() {
        let mut data = rows(&[(1, "b"), (0, "z"), (1, "a")]);
        sort(&mut data, &[1, 2], false).unwrap();
        assert_eq!(data[1][1].mapped(), &Value::from("a"));
        assert_eq!(data[2][1].mapped(), &Value::from("b"));
    }

    #[test]
    fn test_stable_for_full_ties() {
        let mut data = rows(&[(1, "first"), (0, "x"), (1, "second"), (1, "third")]);
        sort(&mut data, &[1], true).unwrap();
        let labels: Vec<_> = data.iter().map(|r| r[1].mapped().clone()).collect();
        assert_eq!(
            labels,
            vec![
                Value::from("first"),
                Value::from("second"),
                Value::from("third"),
                Value::from("x"),
            ]
        );
    }

    #[test]
    fn test_nulls_never_decide() {
        let mut data = vec![
            vec![Cell::new(Value::Null), Cell::new(Value::Int(2))],
            vec![Cell::new(Value::Int(5)), Cell::new(Value::Int(1))],
        ];
        sort(&mut data, &[1, 2], false).unwrap();
        assert_eq!(data[0][1].mapped(), &Value::Int(1));
    }

    #[test]
    fn test_out_of_range_column_ignored() {
        let mut data = rows(&[(2, "b"), (1, "a")]);
        sort(&mut data, &[0, 7, 1], false).unwrap();
        assert_eq!(firsts(&data), vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_comparator_per_position() {
        let by_len = |a: &Value, b: &Value| a.display_value().len().cmp(&b.display_value().len());
        let comparators: [Option<&ValueComparator>; 1] = [Some(&by_len)];
        let keys = build_keys(&[2], Some(&comparators)).unwrap();
        let data = rows(&[(1, "ccc"), (2, "a"), (3, "bb")]);
        let order = sorted_permutation(&data, &keys, false).unwrap();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_short_comparator_list_rejected() {
        let comparators: [Option<&ValueComparator>; 1] = [None];
        let err = build_keys(&[1, 2], Some(&comparators)).err().unwrap();
        assert!(matches!(err, CacheError::IllegalArgument(msg) if msg.contains("position 1")));
    }

    #[test]
    fn test_incomparable_values_leave_rows_untouched() {
        let mut data = vec![
            vec![Cell::new(Value::Int(2))],
            vec![Cell::new(Value::from("x"))],
        ];
        let err = sort(&mut data, &[1], false).unwrap_err();
        assert!(matches!(err, CacheError::TypeConversion { column: 1, .. }));
        assert_eq!(data[0][0].mapped(), &Value::Int(2));
    }

    #[test]
    fn test_merge_sort_matches_stable_sort() {
        let keys: Vec<i32> = (0..37).map(|i| (i * 17 + 5) % 11).collect();
        let mut order: Vec<usize> = (0..keys.len()).collect();
        merge_sort(&mut order, |i, j| Ok(keys[i].cmp(&keys[j]))).unwrap();

        let mut expected: Vec<usize> = (0..keys.len()).collect();
        expected.sort_by_key(|&i| keys[i]);
        assert_eq!(order, expected);
    }

    #[test]
    fn test_nulls_among_many_rows_keep_every_row() {
        let mut data: Vec<Row> = (0..53)
            .map(|i| {
                let value = if i % 3 == 0 { Value::Null } else { Value::Int((i * 29) % 17) };
                vec![Cell::new(value), Cell::new(Value::Int(i))]
            })
            .collect();
        sort(&mut data, &[1], false).unwrap();
        sort(&mut data, &[1], true).unwrap();

        let mut ids: Vec<Value> = data.iter().map(|r| r[1].mapped().clone()).collect();
        ids.sort_by(|a, b| a.natural_cmp(b).unwrap());
        assert_eq!(ids, (0..53).map(Value::Int).collect::<Vec<_>>());
    }

    #[test]
    fn test_neutral_nulls_leave_pair_in_place() {
        // 2 and 1 only ever meet through a null, so nothing moves.
        let mut data = vec![
            vec![Cell::new(Value::Int(2))],
            vec![Cell::new(Value::Null)],
            vec![Cell::new(Value::Null)],
            vec![Cell::new(Value::Int(1))],
        ];
        sort(&mut data, &[1], false).unwrap();
        assert_eq!(
            firsts(&data),
            vec![Value::Int(2), Value::Null, Value::Null, Value::Int(1)]
        );
    }
}
