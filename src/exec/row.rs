//! Result row shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::Value;

/// Related-row data attached to a result row: selected column name to
/// value, or `None` when the foreign key did not resolve.
pub type RelatedFields = Option<IndexMap<String, Value>>;

/// One result row.
///
/// Local columns are top-level fields; related data nests one level under
/// the related table's name. Keeping the two maps separate (rather than one
/// untyped dictionary) lets the export adapters stay type-safe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Selected local columns, in selection order.
    pub fields: IndexMap<String, Value>,
    /// Resolved relations, keyed by related-table name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub relations: IndexMap<String, RelatedFields>,
}

impl Row {
    /// Resolve a column path against this row: a bare name reads a local
    /// field, `related.column` reads through the nested relation. Missing
    /// fields and unresolved relations read as null.
    pub fn value(&self, column: &str) -> Value {
        match column.split_once('.') {
            None => self.fields.get(column).cloned().unwrap_or(Value::Null),
            Some((relation, field)) => match self.relations.get(relation) {
                Some(Some(fields)) => fields.get(field).cloned().unwrap_or(Value::Null),
                _ => Value::Null,
            },
        }
    }
}
