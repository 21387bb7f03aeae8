use super::*;
use crate::primitives::{Draft, MediaKind, ProgressField, WatchStatus};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::cell::RefCell;
use tempfile::TempDir;

fn item(title: &str) -> LibraryItem {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    LibraryItem::from_draft(Draft::new(MediaKind::Book).with_title(title), created).unwrap()
}

fn snapshot_of(titles: &[&str]) -> LibrarySnapshot {
    LibrarySnapshot {
        items: titles.iter().map(|t| item(t)).collect(),
        ..Default::default()
    }
}

/// Store that fails every call and remembers what it was asked to save
#[derive(Default)]
struct BrokenStore {
    attempts: RefCell<usize>,
}

impl LibraryStore for BrokenStore {
    fn load(&self, _user: &str) -> Result<LibrarySnapshot, StoreError> {
        Err(StoreError::Unavailable {
            message: "offline".to_string(),
        })
    }

    fn save(&self, _user: &str, _snapshot: &LibrarySnapshot) -> Result<SaveOutcome, StoreError> {
        *self.attempts.borrow_mut() += 1;
        Err(StoreError::Unavailable {
            message: "offline".to_string(),
        })
    }

    fn location(&self, user: &str) -> String {
        format!("remote://{user}")
    }
}

// ============================================================================
// JsonFileStore
// ============================================================================

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());

    let snapshot = store.load("alice").unwrap();

    assert!(snapshot.items.is_empty());
    assert!(snapshot.pending_restore.is_none());
}

#[test]
fn test_save_then_load_preserves_records_and_slot() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested"));
    let mut snapshot = snapshot_of(&["Dune", "Emma"]);
    snapshot.pending_restore = Some(PendingRestore {
        index: 1,
        item: item("Ulysses"),
        expires_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 31, 0).unwrap(),
    });

    assert_eq!(store.save("alice", &snapshot).unwrap(), SaveOutcome::Saved);
    let loaded = store.load("alice").unwrap();

    assert_eq!(loaded, snapshot);
    assert!(dir.path().join("nested").join("alice.json").exists());
}

#[test]
fn test_saved_document_is_versioned() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.save("bob", &snapshot_of(&["Dune"])).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("bob.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["version"], json!(SNAPSHOT_VERSION));
    assert_eq!(value["items"][0]["title"], json!("Dune"));
    assert!(value.get("pending_restore").is_none());
}

#[test]
fn test_users_are_isolated() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.save("alice", &snapshot_of(&["Dune"])).unwrap();

    assert!(store.load("bob").unwrap().items.is_empty());
}

#[test]
fn test_rejects_path_like_user_ids() {
    let store = JsonFileStore::new("/tmp/unused");

    for user in ["", "../etc", "a/b", "name.json"] {
        assert!(
            matches!(store.load(user), Err(StoreError::InvalidUser { .. })),
            "{user:?} should be rejected"
        );
    }
    assert!(validate_user("sam_2-b").is_ok());
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("alice.json"), "{ not json").unwrap();
    let store = JsonFileStore::new(dir.path());

    assert!(matches!(store.load("alice"), Err(StoreError::Corrupt { .. })));
}

// ============================================================================
// Boundary validation
// ============================================================================

#[test]
fn test_invalid_records_are_skipped() {
    let good = serde_json::to_value(item("Dune")).unwrap();
    let value = json!({
        "version": 1,
        "items": [
            good,
            { "title": "no id", "kind": "book" },
            { "id": "7f1d8a40-3c2e-4a8e-9a5e-2b9f3f4a1c11", "title": "x", "kind": "podcast",
              "created_at": "2024-03-01T09:30:00Z" },
        ]
    });

    let snapshot = LibrarySnapshot::from_value(value);

    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].title, "Dune");
    assert_eq!(snapshot.notices, vec!["Skipped 2 unreadable records"]);
}

#[test]
fn test_loaded_records_are_coerced() {
    let value = json!([{
        "id": "7f1d8a40-3c2e-4a8e-9a5e-2b9f3f4a1c11",
        "title": "  Heat  ",
        "kind": "movie",
        "status": "completed",
        "rating": 12.3,
        "note": "   ",
        "manual_tags": ["Crime", "crime", "LA"],
        "created_at": "2024-03-01T09:30:00Z",
        "progress_current": { "manual": 4 },
        "progress_total": { "auto": 3 }
    }]);

    let snapshot = LibrarySnapshot::from_value(value);
    let heat = &snapshot.items[0];

    assert_eq!(heat.title, "Heat");
    assert_eq!(heat.rating.map(|r| r.value()), Some(10.0));
    assert_eq!(heat.note, None);
    assert_eq!(heat.manual_tags.len(), 2);
    assert_eq!(heat.status, WatchStatus::Completed);
    assert_eq!(heat.progress_current, ProgressField::auto(1));
    assert_eq!(heat.progress_total, ProgressField::auto(1));
    assert!(snapshot.notices.is_empty());
}

#[test]
fn test_blank_titles_are_skipped() {
    let value = json!([{
        "id": "7f1d8a40-3c2e-4a8e-9a5e-2b9f3f4a1c11",
        "title": "   ",
        "kind": "book",
        "created_at": "2024-03-01T09:30:00Z"
    }]);

    let snapshot = LibrarySnapshot::from_value(value);

    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.notices.len(), 1);
}

#[test]
fn test_unreadable_restore_slot_is_dropped() {
    let value = json!({ "items": [], "pending_restore": { "index": "first" } });

    let snapshot = LibrarySnapshot::from_value(value);

    assert!(snapshot.pending_restore.is_none());
}

#[test]
fn test_state_round_trip() {
    let snapshot = snapshot_of(&["Dune", "Emma"]);

    let state = snapshot.clone().into_state();

    assert_eq!(LibrarySnapshot::from_state(&state), snapshot);
}

// ============================================================================
// FallbackStore
// ============================================================================

#[test]
fn test_fallback_load_uses_cache_when_primary_fails() {
    let dir = TempDir::new().unwrap();
    let cache = JsonFileStore::new(dir.path());
    cache.save("alice", &snapshot_of(&["Dune"])).unwrap();
    let store = FallbackStore::new(BrokenStore::default(), cache);

    let snapshot = store.load("alice").unwrap();

    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(
        snapshot.notices,
        vec!["Couldn't read remote://alice; using local cache"]
    );
}

#[test]
fn test_fallback_save_degrades_when_primary_fails() {
    let dir = TempDir::new().unwrap();
    let cache = JsonFileStore::new(dir.path());
    let store = FallbackStore::new(BrokenStore::default(), cache.clone());

    let outcome = store.save("alice", &snapshot_of(&["Dune"])).unwrap();

    assert_eq!(
        outcome,
        SaveOutcome::Degraded("Couldn't save to remote://alice; changes kept in local cache".to_string())
    );
    assert_eq!(cache.load("alice").unwrap().items.len(), 1);
}

#[test]
fn test_fallback_save_fails_when_both_fail() {
    let store = FallbackStore::new(BrokenStore::default(), BrokenStore::default());

    assert!(store.save("alice", &snapshot_of(&["Dune"])).is_err());
}

#[test]
fn test_fallback_prefers_primary() {
    let primary_dir = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let primary = JsonFileStore::new(primary_dir.path());
    let cache = JsonFileStore::new(cache_dir.path());
    primary.save("alice", &snapshot_of(&["Dune", "Emma"])).unwrap();
    cache.save("alice", &snapshot_of(&["Stale"])).unwrap();
    let store = FallbackStore::new(primary, cache);

    let snapshot = store.load("alice").unwrap();

    assert_eq!(snapshot.items.len(), 2);
    assert!(snapshot.notices.is_empty());
}
