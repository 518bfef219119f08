//! Query execution: data-source seam, filter/sort evaluation, bounded
//! preview results, and the last-write-wins preview session.

mod executor;
mod filter;
mod preview;
mod row;
mod sort;
mod source;
mod value;

pub use executor::{QueryExecutor, DEFAULT_ROW_CAP, DEFAULT_TIMEOUT_SECS};
pub use preview::{PreviewSession, PreviewState};
pub use row::{RelatedFields, Row};
pub use source::{DataSource, Dataset, MemoryDataSource, Record};
pub use value::{compare, loose_eq, Value};

/// Errors raised during query execution.
///
/// Execution failures are a result channel, not an application fault:
/// callers surface the message inline and fall back to an empty preview.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("invalid filter on {column}: {reason}")]
    InvalidFilter { column: String, reason: String },

    #[error("query timed out after {0}s")]
    Timeout(u64),

    #[error("data source error: {0}")]
    Source(String),
}

pub type ExecResult<T> = Result<T, ExecError>;
