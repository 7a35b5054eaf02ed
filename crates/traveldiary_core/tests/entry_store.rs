use std::cell::Cell;
use std::collections::HashSet;
use traveldiary_core::{
    sort_newest_first, EntryStore, KeyValueStore, KvError, KvResult, NewTravelEntry,
    PersistenceError, SqliteKeyValueStore, StoreError, ENTRIES_KEY,
};

fn candidate(address: &str, created_at: i64) -> NewTravelEntry {
    NewTravelEntry {
        image_uri: "a".to_string(),
        address: address.to_string(),
        latitude: 48.8,
        longitude: 2.3,
        created_at,
        title: None,
        notes: None,
        date: None,
    }
}

#[test]
fn save_into_empty_store_then_list_returns_one_entry() {
    let store = EntryStore::open_in_memory().unwrap();
    assert!(store.list().is_empty());

    let created = store.save(&candidate("Paris, France", 1000)).unwrap();

    let entries = store.list();
    assert_eq!(entries.len(), 1);
    let stored = &entries[0];
    assert_eq!(stored, &created);
    assert!(!stored.id.is_empty());
    assert_eq!(stored.image_uri, "a");
    assert_eq!(stored.address, "Paris, France");
    assert_eq!(stored.latitude, 48.8);
    assert_eq!(stored.longitude, 2.3);
    assert_eq!(stored.created_at, 1000);
}

#[test]
fn save_preserves_optional_fields_verbatim() {
    let store = EntryStore::open_in_memory().unwrap();
    let mut new_entry = candidate("Kyoto, Japan", 5);
    new_entry.title = Some("Temples".to_string());
    new_entry.notes = Some("  spaced notes  ".to_string());
    new_entry.date = Some(1_700_000_000_000);

    let created = store.save(&new_entry).unwrap();
    let loaded = store.get_by_id(&created.id).unwrap();
    assert_eq!(loaded.title.as_deref(), Some("Temples"));
    assert_eq!(loaded.notes.as_deref(), Some("  spaced notes  "));
    assert_eq!(loaded.date, Some(1_700_000_000_000));
}

#[test]
fn repeated_saves_assign_unique_ids() {
    let store = EntryStore::open_in_memory().unwrap();
    for index in 0..25 {
        let before = store.list().len();
        store.save(&candidate("Paris, France", index)).unwrap();
        assert_eq!(store.list().len(), before + 1);
    }

    let ids: HashSet<String> = store.list().into_iter().map(|entry| entry.id).collect();
    assert_eq!(ids.len(), 25);
}

#[test]
fn save_rejects_invalid_candidates_without_writing() {
    let store = EntryStore::open_in_memory().unwrap();

    let mut missing_photo = candidate("Paris, France", 1);
    missing_photo.image_uri.clear();
    let err = store.save(&missing_photo).unwrap_err();
    assert_eq!(err.to_string(), "Photo is required");

    let mut bad_latitude = candidate("Paris, France", 1);
    bad_latitude.latitude = f64::NAN;
    assert!(matches!(
        store.save(&bad_latitude).unwrap_err(),
        StoreError::Validation(_)
    ));

    assert!(store.medium().get_item(ENTRIES_KEY).unwrap().is_none());
}

#[test]
fn delete_then_get_returns_none_and_shrinks_list() {
    let store = EntryStore::open_in_memory().unwrap();
    let keep = store.save(&candidate("Paris, France", 1)).unwrap();
    let drop_me = store.save(&candidate("Rome, Italy", 2)).unwrap();

    store.delete_by_id(&drop_me.id).unwrap();

    assert!(store.get_by_id(&drop_me.id).is_none());
    let remaining = store.list();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
}

#[test]
fn delete_of_unknown_id_leaves_collection_unchanged() {
    let store = EntryStore::open_in_memory().unwrap();
    store.save(&candidate("Paris, France", 1)).unwrap();
    store.save(&candidate("Rome, Italy", 2)).unwrap();
    let before = store.list();

    store.delete_by_id("nonexistent").unwrap();

    assert_eq!(store.list(), before);
}

#[test]
fn presentation_sort_puts_newest_first() {
    let store = EntryStore::open_in_memory().unwrap();
    store.save(&candidate("Paris, France", 1000)).unwrap();
    store.save(&candidate("Rome, Italy", 2000)).unwrap();

    let mut entries = store.list();
    sort_newest_first(&mut entries);
    let order: Vec<i64> = entries.iter().map(|entry| entry.created_at).collect();
    assert_eq!(order, [2000, 1000]);
}

#[test]
fn clear_removes_everything() {
    let store = EntryStore::open_in_memory().unwrap();
    store.save(&candidate("Paris, France", 1)).unwrap();

    store.clear().unwrap();
    store.clear().unwrap();

    assert!(store.list().is_empty());
}

#[test]
fn corrupt_payload_reads_as_empty() {
    let store = EntryStore::open_in_memory().unwrap();
    store
        .medium()
        .set_item(ENTRIES_KEY, "{not json")
        .unwrap();

    assert!(store.list().is_empty());
    assert!(store.get_by_id("anything").is_none());
}

#[test]
fn payload_uses_camel_case_array_under_fixed_key() {
    let store = EntryStore::open_in_memory().unwrap();
    let created = store.save(&candidate("Paris, France", 1000)).unwrap();

    let raw = store.medium().get_item(ENTRIES_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let items = json.as_array().expect("payload should be a JSON array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], created.id.as_str());
    assert_eq!(items[0]["imageUri"], "a");
    assert_eq!(items[0]["createdAt"], 1000);
    assert!(items[0].get("title").is_none());
}

#[test]
fn reads_entries_written_by_previous_app_versions() {
    let store = EntryStore::open_in_memory().unwrap();
    store
        .medium()
        .set_item(
            ENTRIES_KEY,
            r#"[{"id":"1700000000000","imageUri":"file:///a.jpg","address":"Paris, France",
                "latitude":48.8,"longitude":2.3,"createdAt":1700000000000,"title":null}]"#,
        )
        .unwrap();

    let entry = store.get_by_id("1700000000000").unwrap();
    assert_eq!(entry.title, None);
    assert_eq!(entry.display_title(), "Trip to Paris");

    let created = store.save(&candidate("Rome, Italy", 2)).unwrap();
    assert_ne!(created.id, "1700000000000");
    assert_eq!(store.list().len(), 2);
}

#[test]
fn entries_survive_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diary.sqlite3");

    let store = EntryStore::open(&path).unwrap();
    let created = store.save(&candidate("Paris, France", 1)).unwrap();
    store.close().unwrap();

    let reopened = EntryStore::open(&path).unwrap();
    assert_eq!(reopened.get_by_id(&created.id), Some(created));
}

/// Medium that reads fine but refuses writes after `writes_allowed` calls.
struct QuotaMedium {
    inner: SqliteKeyValueStore,
    writes_allowed: Cell<u32>,
}

impl KeyValueStore for QuotaMedium {
    fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> KvResult<()> {
        let remaining = self.writes_allowed.get();
        if remaining == 0 {
            return Err(KvError::Unavailable("quota exceeded".to_string()));
        }
        self.writes_allowed.set(remaining - 1);
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> KvResult<()> {
        self.inner.remove_item(key)
    }
}

#[test]
fn write_failures_surface_as_persistence_errors() {
    let store = EntryStore::new(QuotaMedium {
        inner: SqliteKeyValueStore::open_in_memory().unwrap(),
        writes_allowed: Cell::new(1),
    });
    let saved = store.save(&candidate("Paris, France", 1)).unwrap();

    let save_err = store.save(&candidate("Rome, Italy", 2)).unwrap_err();
    assert!(matches!(
        save_err,
        StoreError::Persistence(PersistenceError::Medium(KvError::Unavailable(_)))
    ));
    assert_eq!(store.list().len(), 1);

    let delete_err = store.delete_by_id(&saved.id).unwrap_err();
    assert!(matches!(delete_err, StoreError::Persistence(_)));
    assert!(store.get_by_id(&saved.id).is_some());
}

#[test]
fn store_works_through_borrowed_medium() {
    let medium = SqliteKeyValueStore::open_in_memory().unwrap();
    {
        let store = EntryStore::new(&medium);
        store.save(&candidate("Paris, France", 1)).unwrap();
    }
    let again = EntryStore::new(&medium);
    assert_eq!(again.list().len(), 1);
}

/// Medium whose reads fail while `failing_reads` is non-zero.
struct FlakyReadMedium {
    inner: SqliteKeyValueStore,
    failing_reads: Cell<u32>,
}

impl KeyValueStore for FlakyReadMedium {
    fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        let remaining = self.failing_reads.get();
        if remaining > 0 {
            self.failing_reads.set(remaining - 1);
            return Err(KvError::Unavailable("database is locked".to_string()));
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> KvResult<()> {
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> KvResult<()> {
        self.inner.remove_item(key)
    }
}

fn flaky_store_with_three_entries() -> EntryStore<FlakyReadMedium> {
    let store = EntryStore::new(FlakyReadMedium {
        inner: SqliteKeyValueStore::open_in_memory().unwrap(),
        failing_reads: Cell::new(0),
    });
    for (index, city) in ["Paris, France", "Lyon, France", "Nice, France"]
        .into_iter()
        .enumerate()
    {
        store.save(&candidate(city, index as i64)).unwrap();
    }
    store
}

#[test]
fn read_failure_during_save_aborts_without_losing_entries() {
    let store = flaky_store_with_three_entries();
    store.medium().failing_reads.set(1);

    let err = store.save(&candidate("Rome, Italy", 10)).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Persistence(PersistenceError::Medium(KvError::Unavailable(_)))
    ));
    assert_eq!(store.list().len(), 3);
}

#[test]
fn read_failure_during_delete_aborts_without_losing_entries() {
    let store = flaky_store_with_three_entries();
    let target = store.list()[0].id.clone();
    store.medium().failing_reads.set(1);

    let err = store.delete_by_id(&target).unwrap_err();

    assert!(matches!(err, StoreError::Persistence(PersistenceError::Medium(_))));
    assert_eq!(store.list().len(), 3);
    assert!(store.get_by_id(&target).is_some());
}

#[test]
fn save_over_corrupt_payload_replaces_it() {
    let store = EntryStore::open_in_memory().unwrap();
    store.medium().set_item(ENTRIES_KEY, "{not json").unwrap();

    let created = store.save(&candidate("Paris, France", 1)).unwrap();

    assert_eq!(store.list(), vec![created]);
}
