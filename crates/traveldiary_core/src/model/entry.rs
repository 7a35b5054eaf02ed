//! Travel entry records.
//!
//! # Responsibility
//! - Define the persisted record and its JSON wire shape.
//! - Derive presentation values (fallback title, share text, maps link).
//!
//! # Invariants
//! - `id` is assigned by the entry store and never reused.
//! - Wire field names are camelCase and optional fields are omitted when
//!   absent.

use crate::model::validation::{check_required_fields, EntryValidationError};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Opaque store-assigned entry identifier.
pub type EntryId = String;

/// Prefix used when a title is derived from the address.
pub const FALLBACK_TITLE_PREFIX: &str = "Trip to ";

/// One persisted travel memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelEntry {
    pub id: EntryId,
    /// Reference to the captured image resource.
    pub image_uri: String,
    /// Human-readable reverse-geocoded address.
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Unix epoch milliseconds at save time.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// User-editable trip date in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
}

/// Entry candidate accepted by `EntryStore::save` (everything but `id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTravelEntry {
    pub image_uri: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
}

impl NewTravelEntry {
    /// Runs the same required-field checks as `validate_entry`.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        check_required_fields(
            &self.image_uri,
            &self.address,
            Some(self.latitude),
            Some(self.longitude),
        )
    }

    /// Attaches a store-assigned id.
    pub fn with_id(self, id: EntryId) -> TravelEntry {
        TravelEntry {
            id,
            image_uri: self.image_uri,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: self.created_at,
            title: self.title,
            notes: self.notes,
            date: self.date,
        }
    }
}

/// Add-entry form state before it is saved.
///
/// Coordinates stay optional until a location fix arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub image_uri: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub title: String,
    pub notes: String,
    pub date: Option<i64>,
}

impl EntryDraft {
    /// Drops the captured photo.
    pub fn clear_image(&mut self) {
        self.image_uri.clear();
    }

    /// Drops the resolved address and coordinates.
    pub fn clear_location(&mut self) {
        self.address.clear();
        self.latitude = None;
        self.longitude = None;
    }

    /// Converts a validated draft into a store candidate.
    ///
    /// Blank titles fall back to `Trip to <first address segment>`; blank
    /// notes are stored as absent.
    pub fn into_new_entry(self, created_at: i64) -> Result<NewTravelEntry, EntryValidationError> {
        check_required_fields(&self.image_uri, &self.address, self.latitude, self.longitude)?;
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return Err(EntryValidationError::InvalidLocation);
        };

        let title = match self.title.trim() {
            "" => fallback_title(&self.address),
            trimmed => trimmed.to_string(),
        };
        let notes = if self.notes.trim().is_empty() {
            None
        } else {
            Some(self.notes)
        };

        Ok(NewTravelEntry {
            image_uri: self.image_uri,
            address: self.address,
            latitude,
            longitude,
            created_at,
            title: Some(title),
            notes,
            date: self.date,
        })
    }
}

/// Host platform used to pick the maps deep-link scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapsPlatform {
    Ios,
    Android,
}

impl TravelEntry {
    /// Title shown in lists and detail views.
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => fallback_title(&self.address),
        }
    }

    /// Second comma-separated address segment (usually the city).
    pub fn locality(&self) -> Option<&str> {
        self.address
            .split(',')
            .nth(1)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
    }

    /// Text handed to the host share sheet.
    pub fn share_message(&self) -> String {
        format!(
            "Check out my travel memory: {}\n\n{}\n\n{}",
            self.display_title(),
            self.address,
            self.notes.as_deref().unwrap_or_default()
        )
    }

    /// Deep link opening the entry location in the platform maps app.
    pub fn maps_url(&self, platform: MapsPlatform) -> String {
        let query = urlencoding::encode(&self.address);
        match platform {
            MapsPlatform::Ios => format!(
                "maps://app?ll={},{}&q={query}",
                self.latitude, self.longitude
            ),
            MapsPlatform::Android => {
                format!("geo:{},{}?q={query}", self.latitude, self.longitude)
            }
        }
    }
}

/// Sorts entries newest first by `created_at`.
///
/// The sort is stable, so entries sharing a timestamp keep store order.
pub fn sort_newest_first(entries: &mut [TravelEntry]) {
    entries.sort_by_key(|entry| Reverse(entry.created_at));
}

fn fallback_title(address: &str) -> String {
    let first_segment = address.split(',').next().unwrap_or_default().trim();
    format!("{FALLBACK_TITLE_PREFIX}{first_segment}")
}
