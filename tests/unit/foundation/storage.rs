use std::path::PathBuf;

use super::*;

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("private mode".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("private mode".into()))
    }
}

#[test]
fn memory_store_roundtrips_values() {
    let mut store = MemoryStore::new();
    assert!(store.is_empty());
    store.set("themeIndex", "4").unwrap();
    assert_eq!(store.get("themeIndex").unwrap().as_deref(), Some("4"));
    store.remove("themeIndex").unwrap();
    assert_eq!(store.get("themeIndex").unwrap(), None);
}

#[test]
fn best_effort_helpers_swallow_failures() {
    let mut store = BrokenStore;
    assert_eq!(read_or_none(&store, "colorMode"), None);
    write_quietly(&mut store, "colorMode", "dark");
    remove_quietly(&mut store, "colorMode");
}

#[test]
fn json_file_store_persists_between_opens() {
    let dir = PathBuf::from("target").join("storage_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("state.json");
    let _ = std::fs::remove_file(&path);

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("cinematic-intro-played").unwrap(), None);
        store.set("cinematic-intro-played", "true").unwrap();
    }

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(
        store.get("cinematic-intro-played").unwrap().as_deref(),
        Some("true")
    );
}

#[test]
fn json_file_store_reports_corrupt_files() {
    let dir = PathBuf::from("target").join("storage_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("corrupt.json");
    std::fs::write(&path, b"{ not json").unwrap();
    assert!(matches!(
        JsonFileStore::open(&path),
        Err(StorageError::Corrupt(_))
    ));
}
