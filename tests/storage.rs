use pretty_assertions::assert_eq;

use taskers::error::StorageError;
use taskers::storage::LocalStorage;

#[test]
fn missing_file_is_empty_and_created_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("ls.json");

    let mut storage = LocalStorage::open(&path).unwrap();
    assert_eq!(storage.get_item("anything"), None);
    assert!(!path.exists());

    storage.set_item("greeting", "hello").unwrap();
    assert!(path.exists());
    assert_eq!(
        LocalStorage::open(&path).unwrap().get_item("greeting"),
        Some("hello")
    );
}

#[test]
fn remove_item_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ls.json");
    let mut storage = LocalStorage::open(&path).unwrap();
    storage.set_item("a", "1").unwrap();
    storage.set_item("b", "2").unwrap();
    storage.remove_item("a").unwrap();
    storage.remove_item("never-set").unwrap();

    let reopened = LocalStorage::open(&path).unwrap();
    assert_eq!(reopened.get_item("a"), None);
    assert_eq!(reopened.get_item("b"), Some("2"));
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ls.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(
        LocalStorage::open(&path),
        Err(StorageError::Corrupt { .. })
    ));
}

#[test]
fn malformed_value_is_reported_by_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = LocalStorage::open(dir.path().join("ls.json")).unwrap();
    storage.set_item("numbers", "[1, 2,").unwrap();
    match storage.get_json::<Vec<u32>>("numbers") {
        Err(StorageError::Value { key, .. }) => assert_eq!(key, "numbers"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(storage.get_json::<Vec<u32>>("absent").unwrap(), None);
}

#[test]
fn failed_write_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("sub");
    let path = blocker.join("ls.json");
    let mut storage = LocalStorage::open(&path).unwrap();

    // A plain file where the parent directory should go.
    std::fs::write(&blocker, "").unwrap();
    assert!(matches!(
        storage.set_item("lost", "1"),
        Err(StorageError::Io { .. })
    ));
    assert_eq!(storage.get_item("lost"), None);

    std::fs::remove_file(&blocker).unwrap();
    storage.set_item("kept", "2").unwrap();
    let reopened = LocalStorage::open(&path).unwrap();
    assert_eq!(reopened.get_item("lost"), None);
    assert_eq!(reopened.get_item("kept"), Some("2"));
}
