use tabula::report::{AdvancedFilter, FilterOperator, QuerySpec, SortDirection, SortSpec};
use tabula::store::{QueryRepository, SqliteQueryStore, StoreError};

fn roster_spec() -> QuerySpec {
    QuerySpec {
        table: "volunteers".into(),
        columns: vec!["first_name".into(), "last_name".into(), "cities.name".into()],
        include_relations: true,
        related_selections: [("cities".to_string(), vec!["name".to_string()])]
            .into_iter()
            .collect(),
        filters: vec![AdvancedFilter {
            column: "last_name".into(),
            operator: FilterOperator::StartsWith,
            value: "S".into(),
            value_to: None,
        }],
        sorts: vec![SortSpec {
            column: "last_name".into(),
            direction: SortDirection::Asc,
        }],
    }
}

#[test]
fn saved_specs_round_trip_with_full_fidelity() {
    let store = SqliteQueryStore::open_in_memory().unwrap();

    let saved = store.save("Roster", &roster_spec()).unwrap();
    assert_eq!(saved.name, "Roster");
    assert!(saved.created_at > 0);
    assert_eq!(saved.created_at, saved.updated_at);

    let loaded = store.load(&saved.id).unwrap().unwrap();
    assert_eq!(loaded.spec, roster_spec());
}

#[test]
fn duplicate_names_keep_exactly_one_record() {
    let store = SqliteQueryStore::open_in_memory().unwrap();

    store.save("Monthly hours", &roster_spec()).unwrap();
    let err = store
        .save("Monthly hours", &QuerySpec::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(_)));

    let all = store.list().unwrap();
    assert_eq!(all.len(), 1);
    // The losing write left no trace.
    assert_eq!(all[0].spec, roster_spec());
}

#[test]
fn list_returns_most_recently_updated_first() {
    let store = SqliteQueryStore::open_in_memory().unwrap();

    store.save("first", &roster_spec()).unwrap();
    store.save("second", &roster_spec()).unwrap();
    store.save("third", &roster_spec()).unwrap();

    let names: Vec<String> = store.list().unwrap().into_iter().map(|q| q.name).collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[test]
fn update_is_delete_then_recreate() {
    let store = SqliteQueryStore::open_in_memory().unwrap();

    let original = store.save("Roster", &roster_spec()).unwrap();
    assert!(store.delete(&original.id).unwrap());

    let replacement = store.save("Roster", &QuerySpec::default()).unwrap();
    assert_ne!(replacement.id, original.id);

    let all = store.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].spec, QuerySpec::default());
}

#[test]
fn load_and_delete_of_missing_ids_are_clean_misses() {
    let store = SqliteQueryStore::open_in_memory().unwrap();

    assert!(store.load("no-such-id").unwrap().is_none());
    assert!(!store.delete("no-such-id").unwrap());
}
