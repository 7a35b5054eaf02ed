//! Travel diary use-case service.
//!
//! # Responsibility
//! - Drive the add-entry flow: capture photo, resolve location, save, notify.
//! - Serve the home list (newest first), detail lookup, delete and summary.
//! - Translate store and device failures into one user-facing error type.
//!
//! # Invariants
//! - Every step is awaited before the next; nothing runs in the background.
//! - A failed location lookup clears the captured photo from the draft.
//! - The "saved" notification is sent only after the store write succeeded.
//! - Errors never carry user content into logs.

use crate::device::capability::DeviceCapability;
use crate::device::ports::{
    CameraCapture, CaptureOutcome, Clock, Geolocation, Haptics, NoopHaptics, Notifier,
    SystemClock,
};
use crate::kv::KeyValueStore;
use crate::model::entry::{EntryDraft, TravelEntry};
use crate::model::validation::{validate_entry, EntryValidationError};
use crate::repo::entry_store::{EntryStore, PersistenceError, StoreError};
use crate::service::entry_service::{saved_message, EntryService};
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DiaryResult<T> = Result<T, DiaryError>;

/// Notification title sent after a successful save.
pub const SAVED_NOTIFICATION_TITLE: &str = "New Travel Entry";

/// Which user action a non-permission device failure interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaryAction {
    TakePhoto,
    Locate,
    Save,
    Delete,
}

impl DiaryAction {
    /// Alert text when this action failed for a non-permission reason.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::TakePhoto => "Failed to take photo",
            Self::Locate => "Failed to get your location",
            Self::Save => "Failed to save entry",
            Self::Delete => "Failed to delete entry",
        }
    }
}

/// Error surfaced to the initiating screen as a single alert.
#[derive(Debug)]
pub enum DiaryError {
    /// The user declined a device permission.
    PermissionDenied(DeviceCapability),
    /// A device call failed for a reason other than permissions.
    Device {
        action: DiaryAction,
        message: String,
    },
    /// The draft misses a required field.
    Validation(EntryValidationError),
    /// The entry store could not be written.
    Persistence {
        action: DiaryAction,
        source: PersistenceError,
    },
}

impl DiaryError {
    /// Alert text for the user. Never includes diagnostic details.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied(capability) => capability.denied_message(),
            Self::Device { action, .. } | Self::Persistence { action, .. } => {
                action.failure_message()
            }
            Self::Validation(err) => err.message(),
        }
    }

    pub(crate) fn from_store(action: DiaryAction, err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => Self::Validation(err),
            StoreError::Persistence(source) => Self::Persistence { action, source },
        }
    }
}

impl Display for DiaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied(capability) => write!(f, "permission denied: {capability}"),
            Self::Device { action, message } => {
                write!(f, "{}: {message}", action.failure_message())
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence { action, source } => {
                write!(f, "{}: {source}", action.failure_message())
            }
        }
    }
}

impl Error for DiaryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence { source, .. } => Some(source),
            Self::PermissionDenied(_) | Self::Device { .. } => None,
        }
    }
}

impl From<EntryValidationError> for DiaryError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Outcome of a photo capture attempt that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    /// Photo and location are both on the draft.
    Captured,
    /// The user backed out of the camera; the draft is unchanged.
    Cancelled,
}

/// Home screen statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiarySummary {
    /// Number of stored memories.
    pub memories: usize,
    /// Number of distinct localities across memories.
    pub locations: usize,
}

/// Host device ports consumed by the diary service.
pub struct DevicePorts {
    pub camera: Box<dyn CameraCapture>,
    pub geolocation: Box<dyn Geolocation>,
    pub notifier: Box<dyn Notifier>,
    pub haptics: Box<dyn Haptics>,
    pub clock: Box<dyn Clock>,
}

impl DevicePorts {
    /// Bundles the required ports with no-op haptics and the system clock.
    pub fn new(
        camera: impl CameraCapture + 'static,
        geolocation: impl Geolocation + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self {
            camera: Box::new(camera),
            geolocation: Box::new(geolocation),
            notifier: Box::new(notifier),
            haptics: Box::new(NoopHaptics),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}

/// Screen-level travel diary flows over one injected entry store.
pub struct DiaryService<M: KeyValueStore> {
    entries: EntryService<M>,
    devices: DevicePorts,
}

impl<M: KeyValueStore> DiaryService<M> {
    pub fn new(store: EntryStore<M>, devices: DevicePorts) -> Self {
        Self {
            entries: EntryService::new(store),
            devices,
        }
    }

    /// Borrows the underlying entry store.
    pub fn store(&self) -> &EntryStore<M> {
        self.entries.store()
    }

    /// Releases the store, e.g. to close its medium.
    pub fn into_store(self) -> EntryStore<M> {
        self.entries.into_store()
    }

    /// Takes a photo and resolves the current address onto `draft`.
    ///
    /// # Contract
    /// - Camera cancel leaves `draft` untouched and returns `Cancelled`.
    /// - Any location failure clears the photo and the location fields.
    pub fn capture_memory(&self, draft: &mut EntryDraft) -> DiaryResult<CaptureStatus> {
        self.devices.haptics.impact();

        let image_uri = match self.devices.camera.capture() {
            CaptureOutcome::Success(uri) => uri,
            CaptureOutcome::Cancelled => {
                info!("event=capture_photo module=service status=cancelled");
                return Ok(CaptureStatus::Cancelled);
            }
            CaptureOutcome::Declined => {
                warn!("event=capture_photo module=service status=denied capability=camera");
                return Err(DiaryError::PermissionDenied(DeviceCapability::Camera));
            }
            CaptureOutcome::Failed(message) => {
                warn!("event=capture_photo module=service status=error error={message}");
                return Err(DiaryError::Device {
                    action: DiaryAction::TakePhoto,
                    message,
                });
            }
        };
        draft.image_uri = image_uri;

        if let Err(err) = self.resolve_location(draft) {
            draft.clear_image();
            draft.clear_location();
            return Err(err);
        }

        info!("event=capture_memory module=service status=ok");
        Ok(CaptureStatus::Captured)
    }

    fn resolve_location(&self, draft: &mut EntryDraft) -> DiaryResult<()> {
        let coords = match self.devices.geolocation.current_position() {
            CaptureOutcome::Success(coords) => coords,
            CaptureOutcome::Declined => {
                warn!("event=locate module=service status=denied capability=location");
                return Err(DiaryError::PermissionDenied(DeviceCapability::Location));
            }
            CaptureOutcome::Cancelled => return Err(locate_failure("position request cancelled")),
            CaptureOutcome::Failed(message) => return Err(locate_failure(message)),
        };

        let address = match self.devices.geolocation.reverse_geocode(coords) {
            CaptureOutcome::Success(address) => address.format(),
            CaptureOutcome::Declined => {
                return Err(DiaryError::PermissionDenied(DeviceCapability::Location))
            }
            CaptureOutcome::Cancelled => return Err(locate_failure("geocoding cancelled")),
            CaptureOutcome::Failed(message) => return Err(locate_failure(message)),
        };
        if address.is_empty() {
            return Err(locate_failure("geocoder returned no address"));
        }

        draft.address = address;
        draft.latitude = Some(coords.latitude);
        draft.longitude = Some(coords.longitude);
        Ok(())
    }

    /// Validates and saves `draft`, then notifies the user.
    ///
    /// The draft is left untouched so the caller can reset its form.
    pub fn save_draft(&self, draft: &EntryDraft) -> DiaryResult<TravelEntry> {
        validate_entry(draft)?;

        self.devices.haptics.success();
        let created = self
            .entries
            .save_draft(draft, self.devices.clock.now_ms())
            .inspect_err(|_| self.devices.haptics.error())?;

        self.devices
            .notifier
            .notify(SAVED_NOTIFICATION_TITLE, &saved_message(&created));
        Ok(created)
    }

    /// Lists all entries newest first.
    pub fn load_entries(&self) -> Vec<TravelEntry> {
        self.entries.load_entries()
    }

    /// Looks up one entry for the detail screen.
    pub fn entry(&self, id: &str) -> Option<TravelEntry> {
        self.entries.entry(id)
    }

    /// Deletes an entry and returns the refreshed newest-first list.
    pub fn delete_entry(&self, id: &str) -> DiaryResult<Vec<TravelEntry>> {
        self.entries.delete_entry(id)
    }

    /// Memory count and distinct locality count for the home screen.
    pub fn summary(&self) -> DiarySummary {
        self.entries.summary()
    }
}

/// Computes home screen statistics for `entries`.
pub fn summarize(entries: &[TravelEntry]) -> DiarySummary {
    let locations = entries
        .iter()
        .filter_map(TravelEntry::locality)
        .collect::<BTreeSet<_>>()
        .len();
    DiarySummary {
        memories: entries.len(),
        locations,
    }
}

fn locate_failure(message: impl Into<String>) -> DiaryError {
    let message = message.into();
    warn!("event=locate module=service status=error error={message}");
    DiaryError::Device {
        action: DiaryAction::Locate,
        message,
    }
}
