//! Export adapters: stateless consumers of an executed result set.

mod csv;
mod flatten;
mod pdf;

pub use csv::{csv_filename, to_csv};
pub use flatten::{flatten_row, flatten_rows, FlatRecord};
pub use pdf::PdfRenderer;

/// Errors raised by export operations.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Export was attempted with zero rows; aborted before any adapter ran.
    #[error("nothing to export: the result set is empty")]
    Empty,

    /// The renderer backing a PDF export failed.
    #[error("render failed: {0}")]
    RenderFailed(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
