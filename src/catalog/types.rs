//! Schema description types for reportable tables.

use serde::{Deserialize, Serialize};

/// Logical column type as reported by the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Timestamp,
    Uuid,
    Json,
}

/// A single column of a reportable table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name (unique within the table).
    pub name: String,
    /// Logical type.
    #[serde(rename = "type")]
    pub data_type: ColumnType,
}

fn default_referenced_column() -> String {
    "id".to_string()
}

/// A one-hop relationship to another table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Local column holding the reference.
    pub column: String,
    /// Name of the referenced table.
    pub references: String,
    /// Column in the referenced table the value points at.
    #[serde(default = "default_referenced_column")]
    pub referenced_column: String,
}

/// Description of one reportable table.
///
/// Column order is display order. Produced once per session by the catalog
/// fetch and treated as immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name (unique within the catalog).
    pub name: String,
    /// Columns in display order.
    pub columns: Vec<ColumnSchema>,
    /// One-hop relationships to other tables.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of all local columns, in display order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Tables reachable via this table's foreign keys, deduplicated.
    ///
    /// A table referenced by multiple foreign keys appears once, at the
    /// position of its first reference.
    pub fn related_tables(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for fk in &self.foreign_keys {
            if !seen.contains(&fk.references.as_str()) {
                seen.push(fk.references.as_str());
            }
        }
        seen
    }

    /// The first foreign key pointing at `table`, if any.
    pub fn foreign_key_to(&self, table: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.references == table)
    }
}

/// The full set of reportable tables for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    tables: Vec<TableSchema>,
}

impl Catalog {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    /// All tables, in catalog order.
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
