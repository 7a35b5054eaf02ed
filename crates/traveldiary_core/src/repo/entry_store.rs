//! Travel entry store backed by one key of a key-value medium.
//!
//! # Responsibility
//! - Assign unique ids and append new entries.
//! - Read back, look up and delete entries.
//!
//! # Invariants
//! - The whole collection lives as one JSON array under `ENTRIES_KEY`.
//! - Every mutation is a full read-modify-write of that array. There is no
//!   cross-call isolation: concurrent writers can lose updates, so callers
//!   must issue mutations one at a time.
//! - `list` reads unreadable or corrupt state as an empty collection.
//! - Mutations abort on a medium read failure; only a corrupt payload is
//!   treated as empty and overwritten.
//! - Persisted order is insertion order but is not part of the contract.

use crate::db::DbResult;
use crate::kv::{KeyValueStore, KvError, SqliteKeyValueStore};
use crate::model::entry::{EntryId, NewTravelEntry, TravelEntry};
use crate::model::validation::EntryValidationError;
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

/// Fixed medium key holding the serialized entry array.
pub const ENTRIES_KEY: &str = "travel_entries";

pub type StoreResult<T> = Result<T, StoreError>;

/// Underlying medium could not be read, written or (de)serialized.
#[derive(Debug)]
pub enum PersistenceError {
    Medium(KvError),
    Serialization(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medium(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "entry serialization failed: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Medium(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

/// Error returned by entry store mutations.
#[derive(Debug)]
pub enum StoreError {
    Validation(EntryValidationError),
    Persistence(PersistenceError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for StoreError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for StoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Persistence(PersistenceError::Medium(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Persistence(PersistenceError::Serialization(value))
    }
}

/// Durable collection of travel entries.
pub struct EntryStore<M: KeyValueStore> {
    medium: M,
}

impl EntryStore<SqliteKeyValueStore> {
    /// Opens a store over the SQLite database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(SqliteKeyValueStore::open(path)?))
    }

    /// Opens a store over a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(SqliteKeyValueStore::open_in_memory()?))
    }

    /// Releases the underlying connection.
    pub fn close(self) -> DbResult<()> {
        self.medium.close()
    }
}

impl<M: KeyValueStore> EntryStore<M> {
    /// Creates a store writing through the provided medium.
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    /// Borrows the underlying medium.
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Validates `candidate`, assigns a fresh id and appends it.
    ///
    /// # Errors
    /// - `StoreError::Validation` when a required field is missing.
    /// - `StoreError::Persistence` when the collection cannot be written;
    ///   the entry is then not saved.
    pub fn save(&self, candidate: &NewTravelEntry) -> StoreResult<TravelEntry> {
        let started_at = Instant::now();
        candidate.validate()?;

        let mut entries = self.read_for_update()?;
        let taken: HashSet<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
        let id = fresh_id(&taken);
        let created = candidate.clone().with_id(id);
        entries.push(created.clone());

        match self.write_all(&entries) {
            Ok(()) => {
                info!(
                    "event=entry_save module=store status=ok duration_ms={} entry_count={}",
                    started_at.elapsed().as_millis(),
                    entries.len()
                );
                Ok(created)
            }
            Err(err) => {
                error!(
                    "event=entry_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns every stored entry in no guaranteed order.
    ///
    /// Missing, unreadable or corrupt state yields an empty collection.
    pub fn list(&self) -> Vec<TravelEntry> {
        match self.read_all() {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "event=entry_list module=store status=degraded error_code=unreadable_entries error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    /// Looks up one entry by id.
    pub fn get_by_id(&self, id: &str) -> Option<TravelEntry> {
        self.list().into_iter().find(|entry| entry.id == id)
    }

    /// Removes the entry with `id`; an absent id is a successful no-op.
    pub fn delete_by_id(&self, id: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        let mut entries = self.read_for_update()?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);

        match self.write_all(&entries) {
            Ok(()) => {
                info!(
                    "event=entry_delete module=store status=ok duration_ms={} removed={} entry_count={}",
                    started_at.elapsed().as_millis(),
                    before - entries.len(),
                    entries.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=entry_delete module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Removes the whole collection from the medium.
    pub fn clear(&self) -> StoreResult<()> {
        self.medium.remove_item(ENTRIES_KEY).map_err(|err| {
            error!("event=entry_clear module=store status=error error={err}");
            StoreError::from(err)
        })?;
        info!("event=entry_clear module=store status=ok");
        Ok(())
    }

    /// Reads the collection ahead of a rewrite.
    ///
    /// A corrupt payload reads as empty so the next write replaces it; a
    /// medium read failure aborts the mutation before anything is written.
    fn read_for_update(&self) -> StoreResult<Vec<TravelEntry>> {
        match self.read_all() {
            Ok(entries) => Ok(entries),
            Err(StoreError::Persistence(PersistenceError::Serialization(err))) => {
                warn!(
                    "event=entry_read module=store status=degraded error_code=corrupt_entries error={}",
                    err
                );
                Ok(Vec::new())
            }
            Err(err) => {
                error!("event=entry_read module=store status=error error={err}");
                Err(err)
            }
        }
    }

    fn read_all(&self) -> StoreResult<Vec<TravelEntry>> {
        match self.medium.get_item(ENTRIES_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_all(&self, entries: &[TravelEntry]) -> StoreResult<()> {
        let raw = serde_json::to_string(entries)?;
        self.medium.set_item(ENTRIES_KEY, &raw)?;
        Ok(())
    }
}

fn fresh_id(taken: &HashSet<&str>) -> EntryId {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
}
