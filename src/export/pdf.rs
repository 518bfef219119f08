//! PDF rendering seam.

use super::flatten::FlatRecord;
use super::ExportResult;

/// Renders a flattened result set into a paginated document.
///
/// The rendering itself is an external capability; this crate only fixes
/// the interface so a renderer consumes the same flattened view as the CSV
/// adapter. Callers must reject empty result sets before invoking a
/// renderer, the same as for CSV.
pub trait PdfRenderer: Send + Sync {
    /// Render `records` (column order already applied) into document bytes.
    fn render(&self, columns: &[String], records: &[FlatRecord]) -> ExportResult<Vec<u8>>;
}
