use espora_core::StorageError;
use espora_storage::{JsonFileKvStore, KvStore, LocalStore, StorageKey};
use std::collections::BTreeMap;
use std::sync::Arc;

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileKvStore::open(dir.path().join("absent.json"));
    assert_eq!(store.get("selectedItems").unwrap(), None);
}

#[test]
fn set_creates_parent_directories_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("hub.json");
    let store = JsonFileKvStore::open(&path);
    store.set("dueDates", r#"{"A1":"2025-03-01"}"#).unwrap();
    store.set("selectedItems", r#"{"A1":true}"#).unwrap();

    let reopened = JsonFileKvStore::open(&path);
    assert_eq!(
        reopened.get("dueDates").unwrap().as_deref(),
        Some(r#"{"A1":"2025-03-01"}"#)
    );
    assert_eq!(
        reopened.get("selectedItems").unwrap().as_deref(),
        Some(r#"{"A1":true}"#)
    );
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn remove_drops_only_that_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileKvStore::open(dir.path().join("hub.json"));
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.remove("a").unwrap();
    assert_eq!(store.get("a").unwrap(), None);
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
}

#[test]
fn writes_from_another_handle_are_visible() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    let reader = JsonFileKvStore::open(&path);
    let writer = JsonFileKvStore::open(&path);
    writer.set("taskAssignments", "[]").unwrap();
    assert_eq!(reader.get("taskAssignments").unwrap().as_deref(), Some("[]"));
}

#[test]
fn corrupt_file_is_reported_on_read_and_replaced_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    std::fs::write(&path, "not json at all").unwrap();
    let store = JsonFileKvStore::open(&path);

    let err = store.get("formData").unwrap_err();
    assert!(matches!(err, StorageError::CorruptStore { .. }));

    store.set("formData", "{}").unwrap();
    assert_eq!(store.get("formData").unwrap().as_deref(), Some("{}"));
}

#[test]
fn local_store_over_corrupt_file_degrades_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    let local = LocalStore::new(Arc::new(JsonFileKvStore::open(&path)));

    let selected: BTreeMap<String, bool> = local.load(StorageKey::SelectedItems);
    assert!(selected.is_empty());
}
