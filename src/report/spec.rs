//! Report definition types.
//!
//! A [`QuerySpec`] is the operator's complete, user-editable report
//! definition: selected table, ordered column list (local names and
//! `related.column` paths mixed freely), relation inclusion, per-relation
//! column selections, filters, and sort keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Contains,
    StartsWith,
    EndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    In,
}

/// A filter on one column.
///
/// `value_to` is meaningful only for [`FilterOperator::Between`], where it
/// carries the upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedFilter {
    /// Column path: a bare local name or `related.column`.
    pub column: String,
    pub operator: FilterOperator,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_to: Option<String>,
}

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort key. Sequence position in [`QuerySpec::sorts`] is priority:
/// the first entry is the primary key, later entries break ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// The operator's current report definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySpec {
    /// Selected table name; empty means no selection.
    pub table: String,
    /// Ordered, duplicate-free column list. Entries are bare local names
    /// or `related.column` paths; both participate in one user-controlled
    /// order.
    pub columns: Vec<String>,
    /// When false, related columns are excluded regardless of
    /// `related_selections`.
    pub include_relations: bool,
    /// Per-related-table ordered column selections. Mirrors the path
    /// entries of `columns`; the two are kept consistent by the builder.
    pub related_selections: IndexMap<String, Vec<String>>,
    /// Active filters, at most one per column path.
    pub filters: Vec<AdvancedFilter>,
    /// Active sort keys, at most one per column path, in priority order.
    pub sorts: Vec<SortSpec>,
}

impl QuerySpec {
    /// Whether a table is selected.
    pub fn has_table(&self) -> bool {
        !self.table.is_empty()
    }

    /// Split a column entry into `(related_table, column)` if it is a
    /// relation path.
    pub fn split_path(entry: &str) -> Option<(&str, &str)> {
        entry.split_once('.')
    }

    /// The local (non-path) entries of `columns`, in order.
    pub fn local_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| Self::split_path(c).is_none())
    }

    /// The filter on `column`, if any.
    pub fn filter(&self, column: &str) -> Option<&AdvancedFilter> {
        self.filters.iter().find(|f| f.column == column)
    }

    /// The sort on `column`, if any.
    pub fn sort(&self, column: &str) -> Option<&SortSpec> {
        self.sorts.iter().find(|s| s.column == column)
    }
}
