//! Row flattening shared by the export adapters.

use indexmap::IndexMap;

use crate::exec::{Row, Value};

/// One flattened record: column path to value, in column order. Relation
/// paths keep their `related.column` key.
pub type FlatRecord = IndexMap<String, Value>;

/// Resolve every entry of `columns` against `row` into one flat record.
///
/// A bare name reads the top-level field; a `related.column` path reads
/// through the nested relation, substituting null when the related object
/// or the field is absent.
pub fn flatten_row(columns: &[String], row: &Row) -> FlatRecord {
    columns
        .iter()
        .map(|column| (column.clone(), row.value(column)))
        .collect()
}

/// Flatten a whole result set, preserving row order.
pub fn flatten_rows(columns: &[String], rows: &[Row]) -> Vec<FlatRecord> {
    rows.iter().map(|row| flatten_row(columns, row)).collect()
}
