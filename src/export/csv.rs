//! CSV serialization of a flattened result set.

use chrono::NaiveDate;

use crate::exec::Row;

use super::flatten::flatten_row;
use super::{ExportError, ExportResult};

/// Serialize `rows` to CSV text: a header row matching `columns` in their
/// current order, then one line per row with null cells rendered empty.
///
/// Fails with [`ExportError::Empty`] before serializing anything when the
/// result set has no rows.
pub fn to_csv(columns: &[String], rows: &[Row]) -> ExportResult<String> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut out = String::new();
    write_record(&mut out, columns.iter().map(String::as_str));
    for row in rows {
        let flat = flatten_row(columns, row);
        let cells: Vec<String> = flat.values().map(|v| v.render()).collect();
        write_record(&mut out, cells.iter().map(String::as_str));
    }
    Ok(out)
}

/// Download filename for a CSV export: `<table>_<YYYY-MM-DD>.csv`.
pub fn csv_filename(table: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", table, date.format("%Y-%m-%d"))
}

fn write_record<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(cell));
    }
    out.push_str("\r\n");
}

/// Quote a cell when it contains a delimiter, quote, or line break;
/// embedded quotes double.
fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
