//! End-to-end behaviour of the catalog store through its public API

use catalog_store::{CatalogError, CatalogStore, Record, RecordId, RecordPatch, Schema};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_two_items(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("catalog.csv");
    fs::write(&path, "ID,Name,Description\n1,Item1,Desc1\n2,Item2,Desc2\n").unwrap();
    path
}

fn ids(store: &CatalogStore) -> Vec<RecordId> {
    store.list().iter().map(|r| r.id).collect()
}

#[test]
fn test_get_existing_and_missing() {
    let temp_dir = TempDir::new().unwrap();
    let store = CatalogStore::load(write_two_items(&temp_dir)).unwrap();

    let item = store.get(2).unwrap();
    assert_eq!(item.id, 2);
    assert_eq!(item.name(), Some("Item2"));
    assert_eq!(item.description(), Some("Desc2"));
    assert!(store.get(3).is_none());
}

#[test]
fn test_add_save_reload_contains_new_item() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_two_items(&temp_dir);

    let mut store = CatalogStore::load(&path).unwrap();
    store.add(Record::new(3, "Item3", "Desc3")).unwrap();
    store.save(&path).unwrap();

    let reloaded = CatalogStore::load(&path).unwrap();
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.get(3), Some(&Record::new(3, "Item3", "Desc3")));
    assert_eq!(ids(&reloaded), vec![1, 2, 3]);
}

#[test]
fn test_distinct_adds_keep_insertion_order() {
    let mut store = CatalogStore::default();
    let pairs: [(RecordId, &str); 4] = [(40, "d"), (-3, "a"), (7, "c"), (0, "b")];

    for (id, name) in pairs {
        store
            .add(Record::new(id, name, format!("about {}", name)))
            .unwrap();
    }

    assert_eq!(ids(&store), vec![40, -3, 7, 0]);
    for (id, name) in pairs {
        assert_eq!(store.get(id).unwrap().name(), Some(name));
    }
}

#[test]
fn test_rejected_operations_leave_catalog_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = CatalogStore::load(write_two_items(&temp_dir)).unwrap();
    let before = store.list().to_vec();

    assert!(matches!(
        store.add(Record::new(1, "Again", "Again")),
        Err(CatalogError::DuplicateId(1))
    ));
    assert!(matches!(
        store.add(Record::new(3, "", "Desc3")),
        Err(CatalogError::Validation(_))
    ));
    assert!(matches!(
        store.add(Record::new(3, "Item3", " \t")),
        Err(CatalogError::Validation(_))
    ));
    assert!(matches!(
        store.update(99, &RecordPatch::new().name("X")),
        Err(CatalogError::RecordNotFound(99))
    ));
    assert!(matches!(
        store.delete(99),
        Err(CatalogError::RecordNotFound(99))
    ));

    assert_eq!(store.list(), before.as_slice());
    assert!(!store.is_dirty());
}

#[test]
fn test_update_blank_keeps_and_value_overwrites() {
    let mut store = CatalogStore::default();
    store.add(Record::new(1, "Item1", "Desc1")).unwrap();

    store.update(1, &RecordPatch::new().name("")).unwrap();
    assert_eq!(store.get(1).unwrap().name(), Some("Item1"));

    store.update(1, &RecordPatch::new().name("X")).unwrap();
    assert_eq!(store.get(1).unwrap().name(), Some("X"));
}

#[test]
fn test_round_trip_is_stable() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.csv");
    let second = temp_dir.path().join("second.csv");

    let mut store = CatalogStore::default();
    store.add(Record::new(1, "Comma, inside", "Line\nbreak")).unwrap();
    store.add(Record::new(2, "\"Quoted\"", "Unicode: café ☕")).unwrap();
    store.add(Record::new(3, "Plain", "Plain")).unwrap();
    store.delete(2).unwrap();
    store.save(&first).unwrap();

    let mut reloaded = CatalogStore::load(&first).unwrap();
    assert_eq!(reloaded.list(), store.list());

    reloaded.save(&second).unwrap();
    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_generic_columns() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("landmarks.csv");
    fs::write(
        &path,
        "id,name,city,province,category\n\
         0,CN Tower,Toronto,Ontario,Landmark\n\
         1,Capilano Bridge,North Vancouver,British Columbia,Bridge\n",
    )
    .unwrap();

    let mut store = CatalogStore::load(&path).unwrap();
    assert_eq!(store.schema().id_column(), "id");
    assert_eq!(store.next_id(), 2);

    let ontario = store.filter("Province", "ontario").unwrap();
    assert_eq!(ontario.len(), 1);
    assert_eq!(ontario[0].field("name"), Some("CN Tower"));

    let err = store
        .add(Record::with_fields(
            2,
            [("name", "Montmorency Falls"), ("city", "Quebec City")],
        ))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(ref m) if m == "province cannot be empty"));

    store
        .add(Record::with_fields(
            2,
            [
                ("name", "Montmorency Falls"),
                ("city", "Quebec City"),
                ("province", "Quebec"),
                ("category", "Waterfall"),
            ],
        ))
        .unwrap();
    store
        .update(0, &RecordPatch::new().with("Category", "Tower"))
        .unwrap();
    store.save_to_source().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "id,name,city,province,category\n\
         0,CN Tower,Toronto,Ontario,Tower\n\
         1,Capilano Bridge,North Vancouver,British Columbia,Bridge\n\
         2,Montmorency Falls,Quebec City,Quebec,Waterfall\n"
    );
}

#[test]
fn test_malformed_files() {
    let temp_dir = TempDir::new().unwrap();
    let cases = [
        ("ID,Name,Description\n1,Item1,Desc1,Extra\n", 2),
        ("ID,Name,Description\n1,Item1,Desc1\n1.5,Item2,Desc2\n", 3),
        ("Name,Description\nItem1,Desc1\n", 1),
        ("ID,Name,ID\n1,a,1\n", 1),
    ];

    for (i, (content, expected_line)) in cases.iter().enumerate() {
        let path = temp_dir.path().join(format!("bad-{}.csv", i));
        fs::write(&path, content).unwrap();

        match CatalogStore::load(&path) {
            Err(CatalogError::MalformedData { line, .. }) => {
                assert_eq!(line, *expected_line, "case {}", i)
            }
            other => panic!("case {}: expected malformed data, got {:?}", i, other.map(|s| s.len())),
        }
    }
}

#[test]
fn test_load_or_create_then_save_bootstraps_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("catalog.csv");

    let mut store = CatalogStore::load_or_create(&path, Schema::default()).unwrap();
    assert!(store.is_empty());

    let id = store.next_id();
    store.add(Record::new(id, "First", "The first item")).unwrap();
    store.save_to_source().unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "ID,Name,Description\n1,First,The first item\n"
    );
}

#[test]
fn test_search_across_fields() {
    let temp_dir = TempDir::new().unwrap();
    let store = CatalogStore::load(write_two_items(&temp_dir)).unwrap();

    assert_eq!(store.search("item2").len(), 1);
    assert_eq!(store.search("DESC").len(), 2);
    assert_eq!(store.search_regex(r"^Item[12]$").unwrap().len(), 2);
    assert_eq!(
        store.column("Name").unwrap(),
        vec!["Item1".to_string(), "Item2".to_string()]
    );
}
