use indexmap::IndexMap;

use tabula::exec::{Row, Value};
use tabula::export::{
    flatten_row, flatten_rows, to_csv, ExportError, ExportResult, FlatRecord, PdfRenderer,
};

fn row(id: i64, name: &str, city: Option<&str>) -> Row {
    let mut fields = IndexMap::new();
    fields.insert("id".to_string(), Value::Int(id));
    fields.insert("name".to_string(), Value::Text(name.into()));

    let mut relations = IndexMap::new();
    relations.insert(
        "city".to_string(),
        city.map(|c| {
            let mut related = IndexMap::new();
            related.insert("name".to_string(), Value::Text(c.into()));
            related
        }),
    );

    Row { fields, relations }
}

fn columns() -> Vec<String> {
    vec!["id".into(), "name".into(), "city.name".into()]
}

#[test]
fn flattening_resolves_nested_paths() {
    let flat = flatten_row(&columns(), &row(1, "A", Some("Provo")));

    assert_eq!(flat["id"], Value::Int(1));
    assert_eq!(flat["name"], Value::Text("A".into()));
    assert_eq!(flat["city.name"], Value::Text("Provo".into()));
}

#[test]
fn flattening_substitutes_null_for_unresolved_relations() {
    let flat = flatten_row(&columns(), &row(1, "A", None));
    assert_eq!(flat["city.name"], Value::Null);

    // A column the row never carried also reads as null.
    let flat = flatten_row(&["missing".to_string()], &row(1, "A", None));
    assert_eq!(flat["missing"], Value::Null);
}

#[test]
fn flattening_preserves_row_and_column_order() {
    let rows = vec![row(1, "A", Some("Provo")), row(2, "B", None)];
    let flat = flatten_rows(&columns(), &rows);

    assert_eq!(flat.len(), 2);
    let keys: Vec<&String> = flat[0].keys().collect();
    assert_eq!(keys, vec!["id", "name", "city.name"]);
}

#[test]
fn csv_has_a_header_row_and_empty_cells_for_null() {
    let rows = vec![row(1, "A", Some("Provo")), row(2, "B", None)];
    let csv = to_csv(&columns(), &rows).unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines, vec!["id,name,city.name", "1,A,Provo", "2,B,"]);
}

#[test]
fn csv_quotes_cells_containing_delimiters() {
    let rows = vec![row(1, "Jones, Ada \"AJ\"", Some("Provo"))];
    let csv = to_csv(&columns(), &rows).unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[1], "1,\"Jones, Ada \"\"AJ\"\"\",Provo");
}

#[test]
fn exporting_an_empty_result_set_is_rejected() {
    let err = to_csv(&columns(), &[]).unwrap_err();
    assert!(matches!(err, ExportError::Empty));
}

struct DimensionsRenderer;

impl PdfRenderer for DimensionsRenderer {
    fn render(&self, columns: &[String], records: &[FlatRecord]) -> ExportResult<Vec<u8>> {
        Ok(format!("{}x{}", columns.len(), records.len()).into_bytes())
    }
}

#[test]
fn pdf_renderers_consume_the_same_flattened_view() {
    let rows = vec![row(1, "A", Some("Provo")), row(2, "B", None)];
    let flat = flatten_rows(&columns(), &rows);

    let bytes = DimensionsRenderer.render(&columns(), &flat).unwrap();
    assert_eq!(bytes, b"3x2");
}
