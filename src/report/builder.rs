//! Mutable report builder.
//!
//! [`ReportBuilder`] owns the session's [`QuerySpec`] and applies every
//! operator edit against an immutable catalog. Each mutation either applies
//! completely or not at all; after every applied mutation the selectable
//! view is recomputed and stale filter/sort references are pruned.

use std::sync::Arc;

use crate::catalog::Catalog;

use super::derived::{prune_stale_references, selectable_columns, SelectableColumns};
use super::spec::{AdvancedFilter, FilterOperator, QuerySpec, SortDirection, SortSpec};

/// Errors raised by builder mutations. A returned error means the spec was
/// left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecError {
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("unknown column {column} on table {table}")]
    UnknownColumn { table: String, column: String },

    #[error("table {relation} is not reachable from {table}")]
    UnknownRelation { table: String, relation: String },

    #[error("related columns are disabled for this report")]
    RelationsDisabled,

    #[error("column {0} is not part of the current selection")]
    NotSelectable(String),

    #[error("between filter on {0} requires an upper bound")]
    MissingRangeEnd(String),

    #[error("no table selected")]
    NoTable,
}

pub type SpecResult<T> = Result<T, SpecError>;

/// Owns the mutable [`QuerySpec`] for one builder session.
pub struct ReportBuilder {
    catalog: Arc<Catalog>,
    spec: QuerySpec,
}

impl ReportBuilder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            spec: QuerySpec::default(),
        }
    }

    /// Start from an existing definition (a saved query or preset).
    ///
    /// The spec is re-derived and pruned on entry so a definition saved
    /// against an older catalog cannot carry dangling references.
    pub fn with_spec(catalog: Arc<Catalog>, mut spec: QuerySpec) -> SpecResult<Self> {
        if spec.has_table() && catalog.table(&spec.table).is_none() {
            return Err(SpecError::UnknownTable(spec.table));
        }
        prune_stale_references(&mut spec);
        Ok(Self { catalog, spec })
    }

    /// The current report definition.
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// The catalog this session builds against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The derived selectable-column view.
    pub fn selectable_columns(&self) -> SelectableColumns {
        selectable_columns(&self.spec)
    }

    /// Select a table, or clear the selection with an empty name.
    ///
    /// Selecting a table resets the column list to all of its local
    /// columns and clears filters, sorts, and related selections.
    pub fn select_table(&mut self, name: &str) -> SpecResult<()> {
        if name.is_empty() {
            self.spec = QuerySpec::default();
            return Ok(());
        }

        let table = self
            .catalog
            .table(name)
            .ok_or_else(|| SpecError::UnknownTable(name.to_string()))?;

        let include_relations = self.spec.include_relations;
        self.spec = QuerySpec {
            table: table.name.clone(),
            columns: table.column_names(),
            include_relations,
            ..QuerySpec::default()
        };
        Ok(())
    }

    /// Add or remove a local column, preserving the order of the rest.
    pub fn toggle_column(&mut self, name: &str) -> SpecResult<()> {
        let table = self.current_table()?;
        if table.column(name).is_none() {
            return Err(SpecError::UnknownColumn {
                table: table.name.clone(),
                column: name.to_string(),
            });
        }

        if let Some(pos) = self.spec.columns.iter().position(|c| c == name) {
            self.spec.columns.remove(pos);
        } else {
            self.spec.columns.push(name.to_string());
        }
        prune_stale_references(&mut self.spec);
        Ok(())
    }

    /// Add or remove a related column.
    ///
    /// The `related.column` path in the column list and the membership in
    /// the per-relation selection move together, in one mutation.
    pub fn toggle_related_column(&mut self, relation: &str, column: &str) -> SpecResult<()> {
        let table = self.current_table()?;
        if !self.spec.include_relations {
            return Err(SpecError::RelationsDisabled);
        }
        if table.foreign_key_to(relation).is_none() {
            return Err(SpecError::UnknownRelation {
                table: table.name.clone(),
                relation: relation.to_string(),
            });
        }
        let related = self
            .catalog
            .table(relation)
            .ok_or_else(|| SpecError::UnknownTable(relation.to_string()))?;
        if related.column(column).is_none() {
            return Err(SpecError::UnknownColumn {
                table: relation.to_string(),
                column: column.to_string(),
            });
        }

        let path = format!("{relation}.{column}");
        let selection = self
            .spec
            .related_selections
            .entry(relation.to_string())
            .or_default();

        if let Some(pos) = selection.iter().position(|c| c == column) {
            selection.remove(pos);
            self.spec.columns.retain(|c| c != &path);
        } else {
            selection.push(column.to_string());
            self.spec.columns.push(path);
        }
        prune_stale_references(&mut self.spec);
        Ok(())
    }

    /// Move one column-list entry to a new position. Local and related
    /// entries share the same ordered list. Out-of-range indices are a
    /// no-op; the only producer is drag-and-drop over the rendered list.
    pub fn reorder_columns(&mut self, from: usize, to: usize) {
        if from >= self.spec.columns.len() || to >= self.spec.columns.len() || from == to {
            return;
        }
        let entry = self.spec.columns.remove(from);
        self.spec.columns.insert(to, entry);
    }

    /// Enable or disable related columns.
    ///
    /// Disabling clears every related selection and its mirrored path
    /// entries; re-enabling seeds one empty selection per reachable related
    /// table rather than restoring what was cleared.
    pub fn set_include_relations(&mut self, include: bool) -> SpecResult<()> {
        if include == self.spec.include_relations {
            return Ok(());
        }

        if include {
            let reachable: Vec<String> = match self.current_table() {
                Ok(table) => table.related_tables().iter().map(|s| s.to_string()).collect(),
                Err(_) => Vec::new(),
            };
            self.spec.include_relations = true;
            self.spec.related_selections.clear();
            for relation in reachable {
                self.spec.related_selections.insert(relation, Vec::new());
            }
        } else {
            self.spec.include_relations = false;
            self.spec.related_selections.clear();
            self.spec
                .columns
                .retain(|c| QuerySpec::split_path(c).is_none());
        }

        let pruned = prune_stale_references(&mut self.spec);
        if pruned > 0 {
            tracing::debug!(pruned, "dropped stale filter/sort references");
        }
        Ok(())
    }

    /// Add a filter, replacing any existing filter on the same column.
    pub fn add_filter(
        &mut self,
        column: &str,
        operator: FilterOperator,
        value: impl Into<String>,
        value_to: Option<String>,
    ) -> SpecResult<()> {
        if !self.selectable_columns().contains(column) {
            return Err(SpecError::NotSelectable(column.to_string()));
        }
        let value_to = match operator {
            FilterOperator::Between => match value_to {
                Some(v) if !v.is_empty() => Some(v),
                _ => return Err(SpecError::MissingRangeEnd(column.to_string())),
            },
            _ => None,
        };

        let filter = AdvancedFilter {
            column: column.to_string(),
            operator,
            value: value.into(),
            value_to,
        };
        if let Some(existing) = self.spec.filters.iter_mut().find(|f| f.column == column) {
            *existing = filter;
        } else {
            self.spec.filters.push(filter);
        }
        Ok(())
    }

    /// Remove the filter on `column`, if present.
    pub fn remove_filter(&mut self, column: &str) {
        self.spec.filters.retain(|f| f.column != column);
    }

    pub fn clear_filters(&mut self) {
        self.spec.filters.clear();
    }

    /// Add a sort key, replacing any existing key on the same column.
    ///
    /// A replaced key moves to the end of the sequence: re-sorting a column
    /// demotes it to the lowest priority with the new direction.
    pub fn add_sort(&mut self, column: &str, direction: SortDirection) -> SpecResult<()> {
        if !self.selectable_columns().contains(column) {
            return Err(SpecError::NotSelectable(column.to_string()));
        }
        self.spec.sorts.retain(|s| s.column != column);
        self.spec.sorts.push(SortSpec {
            column: column.to_string(),
            direction,
        });
        Ok(())
    }

    /// Remove the sort on `column`, if present.
    pub fn remove_sort(&mut self, column: &str) {
        self.spec.sorts.retain(|s| s.column != column);
    }

    pub fn clear_sorts(&mut self) {
        self.spec.sorts.clear();
    }

    fn current_table(&self) -> SpecResult<&crate::catalog::TableSchema> {
        if !self.spec.has_table() {
            return Err(SpecError::NoTable);
        }
        self.catalog
            .table(&self.spec.table)
            .ok_or_else(|| SpecError::UnknownTable(self.spec.table.clone()))
    }
}
