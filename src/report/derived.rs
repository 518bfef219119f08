//! Derived read-only views over a [`QuerySpec`].
//!
//! Selectable columns are recomputed from scratch after every mutation
//! instead of being patched incrementally, so the pruning rule cannot drift
//! out of sync with the selection state.

use super::spec::QuerySpec;

/// The set of columns a filter or sort may legally reference: the local
/// entries of the column list plus, when relations are included, every
/// selected `related.column` path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectableColumns {
    ordered: Vec<String>,
}

impl SelectableColumns {
    pub fn contains(&self, column: &str) -> bool {
        self.ordered.iter().any(|c| c == column)
    }

    /// Paths in selection order: locals first (column-list order), then
    /// relation paths in selection order per related table.
    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Recompute the selectable-column view for `spec`.
pub fn selectable_columns(spec: &QuerySpec) -> SelectableColumns {
    let mut ordered: Vec<String> = spec.local_columns().map(str::to_string).collect();

    if spec.include_relations {
        for (table, columns) in &spec.related_selections {
            for column in columns {
                let path = format!("{table}.{column}");
                if !ordered.contains(&path) {
                    ordered.push(path);
                }
            }
        }
    }

    SelectableColumns { ordered }
}

/// Drop every filter and sort whose column fell out of the selectable set.
///
/// Routine cleanup after a mutation shrinks the set; not an error surface.
/// Returns how many entries were removed.
pub fn prune_stale_references(spec: &mut QuerySpec) -> usize {
    let selectable = selectable_columns(spec);
    let before = spec.filters.len() + spec.sorts.len();

    spec.filters.retain(|f| selectable.contains(&f.column));
    spec.sorts.retain(|s| selectable.contains(&s.column));

    before - spec.filters.len() - spec.sorts.len()
}
