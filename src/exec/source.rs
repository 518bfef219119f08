//! Data source seam and in-memory implementation.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::catalog::TableSchema;

use super::value::Value;
use super::{ExecError, ExecResult};

/// One raw record as read from the backing store: column name to value.
pub type Record = IndexMap<String, Value>;

/// Trait for reading raw table data.
///
/// The executor does all filtering, ordering, capping, and relation
/// resolution itself; a data source only has to hand back the rows of one
/// table. Implementations over a remote store should surface transport
/// failures as [`ExecError::Source`].
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Read all records of `table`.
    async fn scan(&self, table: &str) -> ExecResult<Vec<Record>>;
}

/// An in-memory data source.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataSource {
    tables: HashMap<String, Vec<Record>>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows of `table`.
    pub fn insert_table(&mut self, table: impl Into<String>, rows: Vec<Record>) {
        self.tables.insert(table.into(), rows);
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn scan(&self, table: &str) -> ExecResult<Vec<Record>> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| ExecError::UnknownTable(table.to_string()))
    }
}

/// A self-contained dataset document: table schemas plus their rows.
///
/// The server binary loads one of these from disk; tests build them inline.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Dataset {
    pub tables: Vec<TableSchema>,
    #[serde(default)]
    pub rows: HashMap<String, Vec<HashMap<String, serde_json::Value>>>,
}

impl Dataset {
    /// Read a dataset document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ExecResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ExecError::Source(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| ExecError::Source(e.to_string()))
    }

    /// Build the in-memory source for this dataset's rows.
    ///
    /// Record fields follow each table's schema column order; fields not in
    /// the schema are dropped, missing fields read as null on access.
    pub fn into_source(self) -> (Vec<TableSchema>, MemoryDataSource) {
        let mut source = MemoryDataSource::new();
        for table in &self.tables {
            let raw_rows = self.rows.get(&table.name).cloned().unwrap_or_default();
            let rows = raw_rows
                .into_iter()
                .map(|mut raw| {
                    let mut record = Record::new();
                    for column in &table.columns {
                        if let Some(v) = raw.remove(&column.name) {
                            record.insert(column.name.clone(), Value::from(v));
                        }
                    }
                    record
                })
                .collect();
            source.insert_table(table.name.clone(), rows);
        }
        (self.tables, source)
    }
}
