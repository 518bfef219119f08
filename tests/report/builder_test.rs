use std::sync::Arc;

use tabula::catalog::{Catalog, ColumnSchema, ColumnType, ForeignKey, TableSchema};
use tabula::report::{FilterOperator, QuerySpec, ReportBuilder, SortDirection, SpecError};

fn col(name: &str, data_type: ColumnType) -> ColumnSchema {
    ColumnSchema {
        name: name.into(),
        data_type,
    }
}

fn fk(column: &str, references: &str) -> ForeignKey {
    ForeignKey {
        column: column.into(),
        references: references.into(),
        referenced_column: "id".into(),
    }
}

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(vec![
        TableSchema {
            name: "volunteers".into(),
            columns: vec![
                col("id", ColumnType::Integer),
                col("first_name", ColumnType::Text),
                col("last_name", ColumnType::Text),
                col("email", ColumnType::Text),
                col("city_id", ColumnType::Integer),
                col("community_id", ColumnType::Integer),
            ],
            foreign_keys: vec![fk("city_id", "cities"), fk("community_id", "communities")],
        },
        TableSchema {
            name: "cities".into(),
            columns: vec![col("id", ColumnType::Integer), col("name", ColumnType::Text)],
            foreign_keys: vec![],
        },
        TableSchema {
            name: "communities".into(),
            columns: vec![col("id", ColumnType::Integer), col("name", ColumnType::Text)],
            foreign_keys: vec![],
        },
    ]))
}

#[test]
fn select_table_seeds_all_local_columns() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();

    let spec = builder.spec();
    assert_eq!(spec.table, "volunteers");
    assert_eq!(
        spec.columns,
        vec![
            "id",
            "first_name",
            "last_name",
            "email",
            "city_id",
            "community_id"
        ]
    );
    assert!(spec.filters.is_empty());
    assert!(spec.sorts.is_empty());
    assert!(spec.related_selections.is_empty());
}

#[test]
fn select_unknown_table_is_a_no_op() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    let before = builder.spec().clone();

    let err = builder.select_table("nonexistent").unwrap_err();
    assert_eq!(err, SpecError::UnknownTable("nonexistent".into()));
    assert_eq!(builder.spec(), &before);
}

#[test]
fn table_switch_resets_everything() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder.set_include_relations(true).unwrap();
    builder.toggle_related_column("cities", "name").unwrap();
    builder
        .add_filter("last_name", FilterOperator::Contains, "Smith", None)
        .unwrap();
    builder.add_sort("first_name", SortDirection::Asc).unwrap();

    builder.select_table("cities").unwrap();

    let spec = builder.spec();
    assert_eq!(spec.columns, vec!["id", "name"]);
    assert!(spec.filters.is_empty());
    assert!(spec.sorts.is_empty());
    assert!(spec.related_selections.is_empty());
}

#[test]
fn clearing_the_selection_empties_the_spec() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder.select_table("").unwrap();
    assert_eq!(builder.spec(), &QuerySpec::default());
}

#[test]
fn toggle_column_removes_and_appends() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("cities").unwrap();

    builder.toggle_column("id").unwrap();
    assert_eq!(builder.spec().columns, vec!["name"]);

    builder.toggle_column("id").unwrap();
    assert_eq!(builder.spec().columns, vec!["name", "id"]);

    let err = builder.toggle_column("population").unwrap_err();
    assert!(matches!(err, SpecError::UnknownColumn { .. }));
}

#[test]
fn toggle_related_column_mirrors_both_sides() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder.set_include_relations(true).unwrap();

    builder.toggle_related_column("cities", "name").unwrap();
    assert!(builder.spec().columns.contains(&"cities.name".to_string()));
    assert_eq!(builder.spec().related_selections["cities"], vec!["name"]);

    builder.toggle_related_column("cities", "name").unwrap();
    assert!(!builder.spec().columns.contains(&"cities.name".to_string()));
    assert!(builder.spec().related_selections["cities"].is_empty());
}

#[test]
fn toggle_related_column_requires_relations_enabled() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();

    let err = builder.toggle_related_column("cities", "name").unwrap_err();
    assert_eq!(err, SpecError::RelationsDisabled);
}

#[test]
fn toggle_related_column_rejects_unreachable_tables() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("cities").unwrap();
    builder.set_include_relations(true).unwrap();

    let err = builder
        .toggle_related_column("volunteers", "email")
        .unwrap_err();
    assert!(matches!(err, SpecError::UnknownRelation { .. }));
}

#[test]
fn reorder_mixes_local_and_related_entries() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder.set_include_relations(true).unwrap();
    builder.toggle_related_column("cities", "name").unwrap();

    let last = builder.spec().columns.len() - 1;
    builder.reorder_columns(last, 0);
    assert_eq!(builder.spec().columns[0], "cities.name");

    // Out-of-range indices leave the list untouched.
    let before = builder.spec().columns.clone();
    builder.reorder_columns(0, 99);
    assert_eq!(builder.spec().columns, before);
}

#[test]
fn enabling_relations_seeds_empty_selections_per_reachable_table() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder.set_include_relations(true).unwrap();

    let selections = &builder.spec().related_selections;
    assert_eq!(
        selections.keys().collect::<Vec<_>>(),
        vec!["cities", "communities"]
    );
    assert!(selections.values().all(|v| v.is_empty()));
}

#[test]
fn disabling_relations_clears_selections_not_just_hides_them() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder.set_include_relations(true).unwrap();
    builder.toggle_related_column("cities", "name").unwrap();

    builder.set_include_relations(false).unwrap();
    assert!(builder.spec().related_selections.is_empty());
    assert!(!builder.spec().columns.contains(&"cities.name".to_string()));

    // Re-enabling starts from scratch, not the prior selection.
    builder.set_include_relations(true).unwrap();
    assert!(builder.spec().related_selections["cities"].is_empty());
}

#[test]
fn filters_replace_rather_than_append() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();

    builder
        .add_filter("email", FilterOperator::Contains, "@example.org", None)
        .unwrap();
    builder
        .add_filter("email", FilterOperator::StartsWith, "admin", None)
        .unwrap();

    let filters = &builder.spec().filters;
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].operator, FilterOperator::StartsWith);
    assert_eq!(builder.spec().filter("email").unwrap().value, "admin");
}

#[test]
fn between_filter_requires_an_upper_bound() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();

    let err = builder
        .add_filter("id", FilterOperator::Between, "1", None)
        .unwrap_err();
    assert_eq!(err, SpecError::MissingRangeEnd("id".into()));
    assert!(builder.spec().filters.is_empty());

    builder
        .add_filter("id", FilterOperator::Between, "1", Some("10".into()))
        .unwrap();
    assert_eq!(builder.spec().filters.len(), 1);
}

#[test]
fn filters_on_unselected_columns_are_rejected() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder.toggle_column("email").unwrap();

    let err = builder
        .add_filter("email", FilterOperator::Eq, "x", None)
        .unwrap_err();
    assert_eq!(err, SpecError::NotSelectable("email".into()));
}

#[test]
fn re_sorting_a_column_moves_it_to_the_end() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();

    builder.add_sort("last_name", SortDirection::Asc).unwrap();
    builder.add_sort("first_name", SortDirection::Asc).unwrap();
    builder.add_sort("last_name", SortDirection::Desc).unwrap();

    let sorts = &builder.spec().sorts;
    assert_eq!(sorts.len(), 2);
    assert_eq!(sorts[0].column, "first_name");
    assert_eq!(sorts[1].column, "last_name");
    assert_eq!(
        builder.spec().sort("last_name").unwrap().direction,
        SortDirection::Desc
    );
}

#[test]
fn shrinking_the_selection_prunes_stale_filters_and_sorts() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder
        .add_filter("email", FilterOperator::Contains, "@", None)
        .unwrap();
    builder.add_sort("email", SortDirection::Asc).unwrap();

    builder.toggle_column("email").unwrap();

    assert!(builder.spec().filters.is_empty());
    assert!(builder.spec().sorts.is_empty());
}

#[test]
fn disabling_relations_prunes_related_filters_and_sorts() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder.set_include_relations(true).unwrap();
    builder.toggle_related_column("cities", "name").unwrap();
    builder
        .add_filter("cities.name", FilterOperator::Eq, "Provo", None)
        .unwrap();
    builder.add_sort("cities.name", SortDirection::Asc).unwrap();

    builder.set_include_relations(false).unwrap();

    assert!(builder.spec().filters.is_empty());
    assert!(builder.spec().sorts.is_empty());
}

#[test]
fn selectable_closure_holds_after_arbitrary_mutations() {
    let mut builder = ReportBuilder::new(catalog());
    builder.select_table("volunteers").unwrap();
    builder.set_include_relations(true).unwrap();
    builder.toggle_related_column("cities", "name").unwrap();
    builder
        .add_filter("cities.name", FilterOperator::Eq, "Provo", None)
        .unwrap();
    builder.add_sort("last_name", SortDirection::Desc).unwrap();
    builder.toggle_column("last_name").unwrap();
    builder.toggle_related_column("cities", "name").unwrap();

    let selectable = builder.selectable_columns();
    for filter in &builder.spec().filters {
        assert!(selectable.contains(&filter.column));
    }
    for sort in &builder.spec().sorts {
        assert!(selectable.contains(&sort.column));
    }
}

#[test]
fn with_spec_prunes_references_a_stale_catalog_left_behind() {
    let spec = QuerySpec {
        table: "volunteers".into(),
        columns: vec!["first_name".into()],
        filters: vec![tabula::report::AdvancedFilter {
            column: "retired_column".into(),
            operator: FilterOperator::Eq,
            value: "x".into(),
            value_to: None,
        }],
        ..QuerySpec::default()
    };

    let builder = ReportBuilder::with_spec(catalog(), spec).unwrap();
    assert!(builder.spec().filters.is_empty());
    assert_eq!(builder.spec().columns, vec!["first_name"]);
}
