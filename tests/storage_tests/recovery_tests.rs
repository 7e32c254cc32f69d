//! Tests for on-disk layout and startup recovery
//!
//! These tests verify:
//! - Element files land at <root>/<shard>/<id>
//! - Reopening rebuilds the durable set but not the cache
//! - Stray and unfinished files are ignored
//! - Out-of-band deletion surfaces as a read error without latching

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use elstore::storage::{file_name, shard_name, ElementLayout, RecoveryScanner};
use elstore::{Config, ElementStore, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_root() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("root");
    (temp_dir, root)
}

fn open(root: &Path, cache_capacity: usize) -> ElementStore {
    ElementStore::open(
        Config::builder()
            .data_dir(root)
            .cache_capacity(cache_capacity)
            .build(),
    )
    .unwrap()
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_element_file_location() {
    let (_temp, root) = setup_temp_root();
    let store = open(&root, 0);

    store.put(0x29a, "x").unwrap();
    store.put(0x40, "y").unwrap();
    store.sync();

    assert_eq!(fs::read(root.join("1a").join("29a")).unwrap(), b"x");
    assert_eq!(fs::read(root.join("0").join("40")).unwrap(), b"y");
}

#[test]
fn test_shard_fanout_is_bounded() {
    let (_temp, root) = setup_temp_root();
    let store = open(&root, 0);

    for id in 0..500u64 {
        store.put(id, id.to_le_bytes().to_vec()).unwrap();
    }
    store.sync();

    let shards = fs::read_dir(&root).unwrap().count();
    assert_eq!(shards, 64);

    let layout = ElementLayout::new(&root);
    for id in [0u64, 63, 64, 499] {
        let path = layout.element_path(id);
        assert_eq!(path, root.join(shard_name(id)).join(file_name(id)));
        assert_eq!(fs::read(path).unwrap(), id.to_le_bytes());
    }
}

#[test]
fn test_no_temp_files_after_sync() {
    let (_temp, root) = setup_temp_root();
    let store = open(&root, 0);

    for id in 0..20u64 {
        store.put(id, "v").unwrap();
    }
    store.sync();

    let (_, report) = RecoveryScanner::scan(&root).unwrap();
    assert_eq!(report.elements_recovered, 20);
    assert_eq!(report.partial_writes, 0);
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[test]
fn test_reopen_recovers_ids_not_cache() {
    let (_temp, root) = setup_temp_root();

    {
        let store = open(&root, 4);
        store.put(1, "one").unwrap();
        store.put(2, "two").unwrap();
        store.sync();
        store.get(1).unwrap();
        assert!(store.is_cached(1));
    }

    let store = open(&root, 4);
    assert!(store.has(1));
    assert!(store.has(2));
    assert_eq!(store.cached_count(), 0);
    assert_eq!(store.read_count(1), 0);
    assert_eq!(store.get(2).unwrap(), Bytes::from_static(b"two"));
}

#[test]
fn test_stray_files_are_ignored() {
    let (_temp, root) = setup_temp_root();
    fs::create_dir_all(root.join("1a")).unwrap();
    fs::write(root.join("README.md"), b"not an element").unwrap();
    fs::write(root.join("1a").join("29a.tmp"), b"partial").unwrap();
    fs::create_dir_all(root.join("nested").join("deeper")).unwrap();

    let store = open(&root, 0);

    assert!(store.is_empty());
    assert!(!store.has(0x29a));

    // The leftover temp file does not block a fresh write of the same id
    store.put(0x29a, "complete").unwrap();
    store.sync();
    assert!(store.write_error().is_none());
    assert_eq!(store.get(0x29a).unwrap(), Bytes::from_static(b"complete"));
}

#[test]
fn test_uppercase_hex_names_are_recovered() {
    let (_temp, root) = setup_temp_root();
    fs::create_dir_all(root.join("1a")).unwrap();
    fs::write(root.join("1a").join("29A"), b"legacy").unwrap();

    let store = open(&root, 0);

    assert!(store.has(0x29a));
    assert!(matches!(store.put(0x29a, "dup"), Err(StoreError::AlreadyExists(0x29a))));
}

#[test]
fn test_deleted_file_is_read_error_not_latched() {
    let (_temp, root) = setup_temp_root();
    let store = open(&root, 0);

    store.put(5, "five").unwrap();
    store.sync();
    fs::remove_file(root.join(shard_name(5)).join(file_name(5))).unwrap();

    let err = store.get(5).unwrap_err();
    assert!(matches!(err, StoreError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    assert!(store.write_error().is_none());

    store.put(6, "six").unwrap();
    store.sync();
    assert_eq!(store.get(6).unwrap(), Bytes::from_static(b"six"));
}

#[test]
fn test_open_fails_when_root_is_a_file() {
    let (_temp, root) = setup_temp_root();
    fs::write(&root, b"occupied").unwrap();

    let result = ElementStore::open(Config::builder().data_dir(&root).build());

    assert!(matches!(result, Err(StoreError::Io(_))));
}
