use tabula::report::{
    prune_stale_references, selectable_columns, AdvancedFilter, FilterOperator, QuerySpec,
    SortDirection, SortSpec,
};

fn spec_with_relations(include_relations: bool) -> QuerySpec {
    QuerySpec {
        table: "volunteers".into(),
        columns: vec![
            "first_name".into(),
            "cities.name".into(),
            "last_name".into(),
        ],
        include_relations,
        related_selections: [("cities".to_string(), vec!["name".to_string()])]
            .into_iter()
            .collect(),
        filters: vec![
            AdvancedFilter {
                column: "last_name".into(),
                operator: FilterOperator::Contains,
                value: "S".into(),
                value_to: None,
            },
            AdvancedFilter {
                column: "cities.name".into(),
                operator: FilterOperator::Eq,
                value: "Provo".into(),
                value_to: None,
            },
        ],
        sorts: vec![SortSpec {
            column: "cities.name".into(),
            direction: SortDirection::Asc,
        }],
    }
}

fn paths(view: &tabula::report::SelectableColumns) -> Vec<&str> {
    view.as_slice().iter().map(String::as_str).collect()
}

#[test]
fn selectable_set_unions_locals_with_included_relation_paths() {
    let view = selectable_columns(&spec_with_relations(true));
    assert_eq!(paths(&view), vec!["first_name", "last_name", "cities.name"]);
}

#[test]
fn relation_paths_drop_out_when_relations_are_excluded() {
    let view = selectable_columns(&spec_with_relations(false));
    assert_eq!(paths(&view), vec!["first_name", "last_name"]);
    assert!(!view.contains("cities.name"));
}

#[test]
fn pruning_removes_exactly_the_unselectable_references() {
    let mut spec = spec_with_relations(false);
    let removed = prune_stale_references(&mut spec);

    assert_eq!(removed, 2);
    assert_eq!(spec.filters.len(), 1);
    assert_eq!(spec.filters[0].column, "last_name");
    assert!(spec.sorts.is_empty());
}

#[test]
fn pruning_is_idempotent() {
    let mut spec = spec_with_relations(true);
    assert_eq!(prune_stale_references(&mut spec), 0);
    assert_eq!(spec.filters.len(), 2);
    assert_eq!(spec.sorts.len(), 1);
}
