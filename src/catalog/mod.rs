//! Schema catalog: introspection and session-scoped caching.
//!
//! The catalog is the leaf component everything else depends on. It is
//! fetched once per builder session and cached for the session's duration.
//! There is no TTL and no invalidation path; a fresh session is the only
//! refresh. If the fetch fails, dependents see an empty catalog state and
//! table selection stays blocked.

mod provider;
mod types;

pub use provider::{SchemaProvider, StaticSchemaProvider};
pub use types::{Catalog, ColumnSchema, ColumnType, ForeignKey, TableSchema};

use std::sync::Arc;

use tokio::sync::OnceCell;

/// Errors raised by catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The backing store could not be introspected.
    #[error("schema unavailable: {0}")]
    SchemaUnavailable(String),

    /// A table name that does not exist in the catalog.
    #[error("unknown table: {0}")]
    UnknownTable(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Session-scoped catalog cache over a [`SchemaProvider`].
///
/// The first successful fetch is memoized; later calls return the cached
/// catalog without touching the provider. A failed fetch is not memoized,
/// so a dependent retry (page reload) hits the provider again.
pub struct SessionCatalog {
    provider: Arc<dyn SchemaProvider>,
    cached: OnceCell<Arc<Catalog>>,
}

impl SessionCatalog {
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self {
            provider,
            cached: OnceCell::new(),
        }
    }

    /// Fetch the catalog, or return the session's cached copy.
    pub async fn load(&self) -> CatalogResult<Arc<Catalog>> {
        let catalog = self
            .cached
            .get_or_try_init(|| async {
                let tables = self.provider.fetch_schema().await?;
                tracing::debug!(tables = tables.len(), "catalog introspected");
                Ok::<_, CatalogError>(Arc::new(Catalog::new(tables)))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    /// The cached catalog, if a fetch already succeeded this session.
    pub fn cached(&self) -> Option<Arc<Catalog>> {
        self.cached.get().cloned()
    }
}
