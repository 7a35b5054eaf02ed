//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, entry-level functions to Dart via FRB.
//! - Device capabilities (camera, GPS, notifications) stay on the Dart side;
//!   Dart passes their results in and shows the returned messages.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the store, performs one operation and closes it, so
//!   calls are serialized by the caller awaiting each one.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use traveldiary_core::db::open_db;
use traveldiary_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    saved_message, validate_entry, DiaryAction, DiaryError, DiaryResult, EntryDraft, EntryService,
    EntryStore, MapsPlatform, SqliteKeyValueStore, TravelEntry,
};

const ENTRY_DB_FILE_NAME: &str = "traveldiary.sqlite3";
const ENTRY_DB_PATH_ENV: &str = "TRAVELDIARY_DB_PATH";
static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Travel entry as rendered by list and detail screens.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryItem {
    pub id: String,
    pub image_uri: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: i64,
    /// Stored title or the `Trip to ...` fallback.
    pub title: String,
    pub notes: Option<String>,
    pub date: Option<i64>,
    /// Text for the platform share sheet.
    pub share_message: String,
    pub maps_url_ios: String,
    pub maps_url_android: String,
}

/// Add-entry form payload collected on the Dart side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraftInput {
    pub image_uri: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub title: String,
    pub notes: String,
    pub date: Option<i64>,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Created entry on successful save.
    pub entry: Option<EntryItem>,
    /// User-facing message for the alert or notification.
    pub message: String,
}

impl EntryActionResponse {
    fn success(message: impl Into<String>, entry: Option<EntryItem>) -> Self {
        Self {
            ok: true,
            entry,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entry: None,
            message: message.into(),
        }
    }
}

/// Home list envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryListResponse {
    /// Entries sorted by `created_at` descending.
    pub items: Vec<EntryItem>,
    pub message: String,
}

/// Home statistics envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiarySummaryResponse {
    pub memories: u32,
    pub locations: u32,
}

/// Runs the pre-save validation helper.
///
/// Returns an empty string when the draft is valid.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_validate(input: EntryDraftInput) -> String {
    match validate_entry(&to_draft(input)) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Validates and saves a draft stamped with `created_at`.
///
/// On success `message` is the body for the host's "New Travel Entry"
/// notification.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_save(input: EntryDraftInput, created_at: i64) -> EntryActionResponse {
    let draft = to_draft(input);
    if let Err(err) = validate_entry(&draft) {
        return EntryActionResponse::failure(err.message());
    }

    match with_entry_service(|service| service.save_draft(&draft, created_at)) {
        Ok(created) => EntryActionResponse::success(
            saved_message(&created),
            Some(to_entry_item(created)),
        ),
        Err(Some(err)) => EntryActionResponse::failure(err.user_message()),
        Err(None) => EntryActionResponse::failure(DiaryAction::Save.failure_message()),
    }
}

/// Lists all entries newest first.
///
/// Storage problems degrade to an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list() -> EntryListResponse {
    let entries = with_entry_service(|service| Ok(service.load_entries())).unwrap_or_default();
    let message = if entries.is_empty() {
        "No memories yet.".to_string()
    } else {
        format!("Found {} memories.", entries.len())
    };
    EntryListResponse {
        items: entries.into_iter().map(to_entry_item).collect(),
        message,
    }
}

/// Looks up one entry for the detail screen.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_get(id: String) -> Option<EntryItem> {
    with_entry_service(|service| Ok(service.entry(id.trim())))
        .ok()
        .flatten()
        .map(to_entry_item)
}

/// Deletes an entry; unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete(id: String) -> EntryActionResponse {
    match with_entry_service(|service| service.delete_entry(id.trim())) {
        Ok(_) => EntryActionResponse::success("Entry deleted.", None),
        Err(Some(err)) => EntryActionResponse::failure(err.user_message()),
        Err(None) => EntryActionResponse::failure(DiaryAction::Delete.failure_message()),
    }
}

/// Memory and distinct-locality counts for the home header.
#[flutter_rust_bridge::frb(sync)]
pub fn diary_summary() -> DiarySummaryResponse {
    let summary = with_entry_service(|service| Ok(service.summary())).unwrap_or_default();
    DiarySummaryResponse {
        memories: u32::try_from(summary.memories).unwrap_or(u32::MAX),
        locations: u32::try_from(summary.locations).unwrap_or(u32::MAX),
    }
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(ENTRY_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
        })
        .clone()
}

/// Opens the entry service, runs `f`, and closes the store.
///
/// `Err(None)` means the database could not be opened.
fn with_entry_service<T>(
    f: impl FnOnce(&EntryService<SqliteKeyValueStore>) -> DiaryResult<T>,
) -> Result<T, Option<DiaryError>> {
    let conn = open_db(resolve_entry_db_path()).map_err(|err| {
        warn!("event=ffi_store_open module=ffi status=error error={err}");
        None
    })?;
    let service = EntryService::new(EntryStore::new(SqliteKeyValueStore::from_connection(conn)));
    let result = f(&service).map_err(Some);
    if let Err(err) = service.into_store().close() {
        warn!("event=ffi_store_close module=ffi status=error error={err}");
    }
    result
}

fn to_draft(input: EntryDraftInput) -> EntryDraft {
    EntryDraft {
        image_uri: input.image_uri,
        address: input.address,
        latitude: input.latitude,
        longitude: input.longitude,
        title: input.title,
        notes: input.notes,
        date: input.date,
    }
}

fn to_entry_item(entry: TravelEntry) -> EntryItem {
    EntryItem {
        title: entry.display_title(),
        share_message: entry.share_message(),
        maps_url_ios: entry.maps_url(MapsPlatform::Ios),
        maps_url_android: entry.maps_url(MapsPlatform::Android),
        id: entry.id,
        image_uri: entry.image_uri,
        address: entry.address,
        latitude: entry.latitude,
        longitude: entry.longitude,
        created_at: entry.created_at,
        notes: entry.notes,
        date: entry.date,
    }
}
