//! Stable multi-key ordering of result rows.

use std::cmp::Ordering;

use crate::report::{SortDirection, SortSpec};

use super::value::{compare, Value};

/// Sort rows by the sort sequence: the first entry is the primary key,
/// later entries break ties, each with its own direction. Rows that tie on
/// every key keep their incoming order.
pub fn sort_rows<T, F>(rows: &mut [T], sorts: &[SortSpec], mut key: F)
where
    F: FnMut(&T, &str) -> Value,
{
    if sorts.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for sort in sorts {
            let ord = compare(&key(a, &sort.column), &key(b, &sort.column));
            let ord = match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}
