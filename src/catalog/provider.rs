//! SchemaProvider trait definition.
//!
//! The SchemaProvider trait abstracts over how the table catalog is
//! introspected. The server binary wraps the schemas of a loaded dataset
//! document in the static provider; a remote introspection endpoint would
//! implement the trait directly.

use async_trait::async_trait;

use super::types::TableSchema;
use super::CatalogResult;

/// Trait for introspecting the reportable-table catalog.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Fetch the schema of every reportable table.
    ///
    /// There is no partial success: either the full catalog is returned or
    /// the fetch fails with [`CatalogError::SchemaUnavailable`].
    async fn fetch_schema(&self) -> CatalogResult<Vec<TableSchema>>;
}

/// A provider backed by an in-memory table list.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaProvider {
    tables: Vec<TableSchema>,
}

impl StaticSchemaProvider {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl SchemaProvider for StaticSchemaProvider {
    async fn fetch_schema(&self) -> CatalogResult<Vec<TableSchema>> {
        Ok(self.tables.clone())
    }
}
