//! Permission-gated device capabilities.

use std::fmt::{Display, Formatter};

/// Device capability the user can decline, failing the current action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceCapability {
    Camera,
    Location,
}

impl DeviceCapability {
    /// Stable id used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Location => "location",
        }
    }

    /// Alert text shown when the user declined the permission.
    pub fn denied_message(self) -> &'static str {
        match self {
            Self::Camera => "Camera permission is required to take photos",
            Self::Location => "Location permission is required to get your address",
        }
    }
}

impl Display for DeviceCapability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
