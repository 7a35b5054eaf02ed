//! Device-free entry use cases.
//!
//! Hosts that run capture and notifications themselves (the FFI layer) pass
//! drafts in here; `DiaryService` layers the device flow on top.

use crate::kv::KeyValueStore;
use crate::model::entry::{sort_newest_first, EntryDraft, TravelEntry};
use crate::model::validation::validate_entry;
use crate::repo::entry_store::EntryStore;
use crate::service::diary_service::{
    summarize, DiaryAction, DiaryError, DiaryResult, DiarySummary,
};
use log::info;

/// Entry list, save and delete flows over one injected entry store.
pub struct EntryService<M: KeyValueStore> {
    store: EntryStore<M>,
}

impl<M: KeyValueStore> EntryService<M> {
    pub fn new(store: EntryStore<M>) -> Self {
        Self { store }
    }

    /// Borrows the underlying entry store.
    pub fn store(&self) -> &EntryStore<M> {
        &self.store
    }

    /// Releases the store, e.g. to close its medium.
    pub fn into_store(self) -> EntryStore<M> {
        self.store
    }

    /// Validates `draft` and saves it stamped with `created_at`.
    pub fn save_draft(&self, draft: &EntryDraft, created_at: i64) -> DiaryResult<TravelEntry> {
        validate_entry(draft)?;
        let candidate = draft.clone().into_new_entry(created_at)?;
        let created = self
            .store
            .save(&candidate)
            .map_err(|err| DiaryError::from_store(DiaryAction::Save, err))?;
        info!("event=save_draft module=service status=ok");
        Ok(created)
    }

    /// Lists all entries newest first.
    pub fn load_entries(&self) -> Vec<TravelEntry> {
        let mut entries = self.store.list();
        sort_newest_first(&mut entries);
        entries
    }

    /// Looks up one entry for the detail screen.
    pub fn entry(&self, id: &str) -> Option<TravelEntry> {
        self.store.get_by_id(id)
    }

    /// Deletes an entry and returns the refreshed newest-first list.
    pub fn delete_entry(&self, id: &str) -> DiaryResult<Vec<TravelEntry>> {
        self.store
            .delete_by_id(id)
            .map_err(|err| DiaryError::from_store(DiaryAction::Delete, err))?;
        Ok(self.load_entries())
    }

    /// Memory count and distinct locality count for the home screen.
    pub fn summary(&self) -> DiarySummary {
        summarize(&self.store.list())
    }
}

/// Body of the notification sent after `entry` was saved.
pub fn saved_message(entry: &TravelEntry) -> String {
    format!("Saved your trip to {}", entry.display_title())
}
