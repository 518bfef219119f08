//! # Tabula
//!
//! Schema-driven report query builder with bounded preview execution and
//! export.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Schema Catalog                           │
//! │     (tables, columns, one-hop foreign keys)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [report builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │        QuerySpec (columns, filters, sorts,               │
//! │         relation selections + derived view)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [executor]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Bounded preview rows (fields + nested relations)     │
//! └─────────────────────────────────────────────────────────┘
//!                │                         │
//!                ▼ [store]                 ▼ [export]
//! ┌──────────────────────────┐  ┌──────────────────────────┐
//! │  Saved queries (SQLite)  │  │   CSV / PDF adapters      │
//! └──────────────────────────┘  └──────────────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod exec;
pub mod export;
pub mod presets;
pub mod report;
pub mod store;

#[cfg(feature = "ui")]
pub mod web;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{
        Catalog, CatalogError, ColumnSchema, ColumnType, ForeignKey, SchemaProvider,
        SessionCatalog, StaticSchemaProvider, TableSchema,
    };
    pub use crate::exec::{
        DataSource, Dataset, ExecError, MemoryDataSource, PreviewSession, QueryExecutor, Record,
        Row, Value, DEFAULT_ROW_CAP,
    };
    pub use crate::export::{csv_filename, flatten_rows, to_csv, ExportError, PdfRenderer};
    pub use crate::presets::{builtin_presets, TemplatePreset};
    pub use crate::report::{
        AdvancedFilter, FilterOperator, QuerySpec, ReportBuilder, SortDirection, SortSpec,
        SpecError,
    };
    pub use crate::store::{QueryRepository, SavedQuery, SqliteQueryStore, StoreError};
}

// Also export the core types at the crate root for convenience
pub use catalog::{Catalog, TableSchema};
pub use exec::{QueryExecutor, Row, Value};
pub use report::{QuerySpec, ReportBuilder};
pub use store::{QueryRepository, SavedQuery};
