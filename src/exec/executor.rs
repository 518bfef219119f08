//! Query execution against a data source.
//!
//! The executor turns a [`QuerySpec`] into a bounded, ordered result set:
//!
//! 1. compile every filter (any malformed filter fails the whole query),
//! 2. read the base table and resolve the one-hop join indexes,
//! 3. apply the filters as one AND-combined predicate,
//! 4. order by the sort sequence,
//! 5. cap the row count,
//! 6. project selected local fields and attach requested related rows.
//!
//! Filters and sorts may reference `related.column` paths; those resolve
//! through the join indexes even though nested objects are only attached
//! for relations with a non-empty selection.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;

use crate::catalog::{Catalog, TableSchema};
use crate::report::QuerySpec;

use super::filter::compile_filters;
use super::row::Row;
use super::sort::sort_rows;
use super::source::{DataSource, Record};
use super::value::Value;
use super::{ExecError, ExecResult};

/// Preview executions never return more rows than this.
pub const DEFAULT_ROW_CAP: usize = 100;

/// Default per-execution timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Executes report specs against a [`DataSource`].
pub struct QueryExecutor {
    catalog: Arc<Catalog>,
    source: Arc<dyn DataSource>,
    row_cap: usize,
    timeout: Duration,
}

impl QueryExecutor {
    pub fn new(catalog: Arc<Catalog>, source: Arc<dyn DataSource>) -> Self {
        Self {
            catalog,
            source,
            row_cap: DEFAULT_ROW_CAP,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_row_cap(mut self, cap: usize) -> Self {
        self.row_cap = cap;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn row_cap(&self) -> usize {
        self.row_cap
    }

    /// Execute `spec` and return the capped, ordered result rows.
    ///
    /// A spec with no table selected yields an empty result, not an error.
    pub async fn execute(&self, spec: &QuerySpec) -> ExecResult<Vec<Row>> {
        if !spec.has_table() {
            return Ok(Vec::new());
        }
        let schema = self
            .catalog
            .table(&spec.table)
            .ok_or_else(|| ExecError::UnknownTable(spec.table.clone()))?;

        let filters = compile_filters(&spec.filters)?;
        let mut records = self.scan(&spec.table).await?;

        let joins = self.build_joins(schema, spec).await?;

        records.retain(|record| {
            filters
                .iter()
                .all(|f| f.matches(&joins.resolve(record, &f.column)))
        });

        sort_rows(&mut records, &spec.sorts, |record, column| {
            joins.resolve(record, column)
        });
        records.truncate(self.row_cap);

        tracing::debug!(
            table = %spec.table,
            rows = records.len(),
            filters = spec.filters.len(),
            "preview executed"
        );

        Ok(records
            .into_iter()
            .map(|record| self.project(&record, spec, &joins))
            .collect())
    }

    /// Read one table through the request timeout.
    async fn scan(&self, table: &str) -> ExecResult<Vec<Record>> {
        tokio::time::timeout(self.timeout, self.source.scan(table))
            .await
            .map_err(|_| ExecError::Timeout(self.timeout.as_secs()))?
    }

    /// Load join indexes for every relation the spec touches: non-empty
    /// related selections plus any relation named by a filter or sort path.
    async fn build_joins(&self, schema: &TableSchema, spec: &QuerySpec) -> ExecResult<JoinSet> {
        let mut wanted: HashSet<&str> = HashSet::new();
        if spec.include_relations {
            for (relation, columns) in &spec.related_selections {
                if !columns.is_empty() {
                    wanted.insert(relation.as_str());
                }
            }
        }
        for column in spec
            .filters
            .iter()
            .map(|f| f.column.as_str())
            .chain(spec.sorts.iter().map(|s| s.column.as_str()))
        {
            if let Some((relation, _)) = QuerySpec::split_path(column) {
                wanted.insert(relation);
            }
        }

        // Relations without a path from the base table are skipped; their
        // lookups read as null.
        let targets: Vec<_> = wanted
            .into_iter()
            .filter_map(|relation| schema.foreign_key_to(relation).map(|fk| (relation, fk)))
            .collect();

        let scans =
            futures::future::join_all(targets.iter().map(|(relation, _)| self.scan(relation)))
                .await;

        let mut joins = JoinSet::default();
        for ((relation, fk), scanned) in targets.into_iter().zip(scans) {
            let related = scanned?;
            let mut index = HashMap::with_capacity(related.len());
            for record in related {
                let key = record
                    .get(&fk.referenced_column)
                    .cloned()
                    .unwrap_or(Value::Null);
                if !key.is_null() {
                    index.insert(key.render(), record);
                }
            }
            joins.relations.insert(
                relation.to_string(),
                Join {
                    fk_column: fk.column.clone(),
                    index,
                },
            );
        }
        Ok(joins)
    }

    /// Shape one record into a result row: selected local fields top-level,
    /// requested related columns nested under the relation name.
    fn project(&self, record: &Record, spec: &QuerySpec, joins: &JoinSet) -> Row {
        let mut fields = IndexMap::new();
        for column in spec.local_columns() {
            fields.insert(
                column.to_string(),
                record.get(column).cloned().unwrap_or(Value::Null),
            );
        }

        let mut relations = IndexMap::new();
        if spec.include_relations {
            for (relation, columns) in &spec.related_selections {
                if columns.is_empty() {
                    continue;
                }
                let related = joins.related_record(record, relation).map(|related| {
                    columns
                        .iter()
                        .map(|c| (c.clone(), related.get(c).cloned().unwrap_or(Value::Null)))
                        .collect::<IndexMap<_, _>>()
                });
                relations.insert(relation.clone(), related);
            }
        }

        Row { fields, relations }
    }
}

/// One resolved join: the local foreign-key column and an index of the
/// related table keyed by its referenced column's rendered value.
struct Join {
    fk_column: String,
    index: HashMap<String, Record>,
}

#[derive(Default)]
struct JoinSet {
    relations: HashMap<String, Join>,
}

impl JoinSet {
    fn related_record(&self, record: &Record, relation: &str) -> Option<&Record> {
        let join = self.relations.get(relation)?;
        let key = record.get(&join.fk_column)?;
        if key.is_null() {
            return None;
        }
        join.index.get(&key.render())
    }

    /// Resolve a bare column or `related.column` path for one base record.
    fn resolve(&self, record: &Record, column: &str) -> Value {
        match QuerySpec::split_path(column) {
            None => record.get(column).cloned().unwrap_or(Value::Null),
            Some((relation, field)) => self
                .related_record(record, relation)
                .and_then(|r| r.get(field).cloned())
                .unwrap_or(Value::Null),
        }
    }
}
