//! Pre-save validation helper.
//!
//! # Responsibility
//! - Report the first violated required-field constraint of a candidate.
//!
//! # Invariants
//! - Check order is fixed: photo, then address, then coordinates.
//! - Validation is pure; it never touches storage or devices.

use crate::model::entry::EntryDraft;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// First required-field violation found on a candidate entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    MissingPhoto,
    MissingAddress,
    InvalidLocation,
}

impl EntryValidationError {
    /// User-facing alert text.
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingPhoto => "Photo is required",
            Self::MissingAddress => "Address is required",
            Self::InvalidLocation => "Location data is invalid",
        }
    }
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for EntryValidationError {}

/// Validates add-entry form state before save.
pub fn validate_entry(draft: &EntryDraft) -> Result<(), EntryValidationError> {
    check_required_fields(
        &draft.image_uri,
        &draft.address,
        draft.latitude,
        draft.longitude,
    )
}

pub(crate) fn check_required_fields(
    image_uri: &str,
    address: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), EntryValidationError> {
    if image_uri.is_empty() {
        return Err(EntryValidationError::MissingPhoto);
    }
    if address.is_empty() {
        return Err(EntryValidationError::MissingAddress);
    }
    match (latitude, longitude) {
        (Some(lat), Some(lng))
            if LATITUDE_RANGE.contains(&lat) && LONGITUDE_RANGE.contains(&lng) =>
        {
            Ok(())
        }
        _ => Err(EntryValidationError::InvalidLocation),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_entry, EntryValidationError};
    use crate::model::entry::EntryDraft;

    fn complete_draft() -> EntryDraft {
        EntryDraft {
            image_uri: "file:///photo.jpg".to_string(),
            address: "Paris, France".to_string(),
            latitude: Some(48.8),
            longitude: Some(2.3),
            ..EntryDraft::default()
        }
    }

    #[test]
    fn accepts_complete_draft() {
        assert_eq!(validate_entry(&complete_draft()), Ok(()));
    }

    #[test]
    fn missing_photo_wins_over_every_other_violation() {
        let draft = EntryDraft::default();
        let err = validate_entry(&draft).unwrap_err();
        assert_eq!(err, EntryValidationError::MissingPhoto);
        assert_eq!(err.to_string(), "Photo is required");
    }

    #[test]
    fn missing_address_reported_only_after_photo_present() {
        let mut draft = complete_draft();
        draft.address.clear();
        draft.latitude = None;
        assert_eq!(
            validate_entry(&draft).unwrap_err().to_string(),
            "Address is required"
        );
    }

    #[test]
    fn either_missing_coordinate_is_invalid_location() {
        let mut draft = complete_draft();
        draft.longitude = None;
        assert_eq!(
            validate_entry(&draft).unwrap_err().to_string(),
            "Location data is invalid"
        );

        let mut draft = complete_draft();
        draft.latitude = None;
        assert_eq!(
            validate_entry(&draft).unwrap_err(),
            EntryValidationError::InvalidLocation
        );
    }

    #[test]
    fn non_finite_or_out_of_range_coordinates_are_invalid() {
        for (lat, lng) in [(f64::NAN, 2.3), (48.8, f64::INFINITY), (91.0, 0.0), (0.0, -180.5)] {
            let mut draft = complete_draft();
            draft.latitude = Some(lat);
            draft.longitude = Some(lng);
            assert_eq!(
                validate_entry(&draft).unwrap_err(),
                EntryValidationError::InvalidLocation,
                "({lat}, {lng}) should be rejected"
            );
        }
    }

    #[test]
    fn zero_coordinates_are_valid() {
        let mut draft = complete_draft();
        draft.latitude = Some(0.0);
        draft.longitude = Some(0.0);
        assert_eq!(validate_entry(&draft), Ok(()));
    }
}
