//! Core domain logic for the travel diary.
//! This crate is the single source of truth for entry invariants.

pub mod db;
pub mod device;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use device::capability::DeviceCapability;
pub use device::ports::{
    CameraCapture, CaptureOutcome, Clock, Coordinates, GeocodedAddress, Geolocation, Haptics,
    NoopHaptics, Notifier, SystemClock,
};
pub use kv::{KeyValueStore, KvError, KvResult, SqliteKeyValueStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    sort_newest_first, EntryDraft, EntryId, MapsPlatform, NewTravelEntry, TravelEntry,
};
pub use model::validation::{validate_entry, EntryValidationError};
pub use repo::entry_store::{EntryStore, PersistenceError, StoreError, StoreResult, ENTRIES_KEY};
pub use service::diary_service::{
    summarize, CaptureStatus, DevicePorts, DiaryAction, DiaryError, DiaryResult, DiaryService,
    DiarySummary,
};
pub use service::entry_service::{saved_message, EntryService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
