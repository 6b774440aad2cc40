use super::*;
use tempfile::TempDir;

#[test]
fn memory_store_round_trips_json() {
    let store = MemoryStore::new();
    save_json(&store, CONTAINER_ORDER_KEY, &["query", "iframe"]);

    let loaded: Option<Vec<String>> = load_json(&store, CONTAINER_ORDER_KEY);
    assert_eq!(loaded, Some(vec!["query".to_owned(), "iframe".to_owned()]));
    assert_eq!(store.get_item(CONTAINER_ORDER_KEY).as_deref(), Some(r#"["query","iframe"]"#));
}

#[test]
fn missing_key_loads_none() {
    let store = MemoryStore::new();
    let loaded: Option<Vec<String>> = load_json(&store, "absent");
    assert!(loaded.is_none());
}

#[test]
fn unparseable_value_loads_none() {
    let store = MemoryStore::new();
    store.set_item(CONTAINER_ORDER_KEY, "not json").unwrap();
    let loaded: Option<Vec<String>> = load_json(&store, CONTAINER_ORDER_KEY);
    assert!(loaded.is_none());
}

#[test]
fn file_store_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state/ui.json");

    let store = JsonFileStore::new(&path);
    save_json(&store, CONTAINER_ORDER_KEY, &["shortcut"]);
    save_json(&store, "other", &true);

    let reopened = JsonFileStore::new(&path);
    let order: Option<Vec<String>> = load_json(&reopened, CONTAINER_ORDER_KEY);
    assert_eq!(order, Some(vec!["shortcut".to_owned()]));
    assert_eq!(load_json::<bool>(&reopened, "other"), Some(true));
}

#[test]
fn file_store_recovers_from_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ui.json");
    std::fs::write(&path, "{{{").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.get_item(CONTAINER_ORDER_KEY).is_none());

    store.set_item(CONTAINER_ORDER_KEY, "[]").unwrap();
    assert_eq!(store.get_item(CONTAINER_ORDER_KEY).as_deref(), Some("[]"));
}
