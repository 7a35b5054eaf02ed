//! Request/response ports implemented by the host platform.

use std::time::{SystemTime, UNIX_EPOCH};

/// Result of one device capability request.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome<T> {
    /// The device produced a value.
    Success(T),
    /// The user declined the permission prompt.
    Declined,
    /// The user dismissed the request without choosing.
    Cancelled,
    /// The platform call failed; carries a diagnostic message.
    Failed(String),
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Structured reverse-geocoding result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeocodedAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl GeocodedAddress {
    /// Joins present, non-blank parts as `street, city, region, country`.
    pub fn format(&self) -> String {
        [&self.street, &self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Camera access producing an image reference.
pub trait CameraCapture {
    fn capture(&self) -> CaptureOutcome<String>;
}

/// Current position and reverse geocoding.
pub trait Geolocation {
    fn current_position(&self) -> CaptureOutcome<Coordinates>;
    fn reverse_geocode(&self, coords: Coordinates) -> CaptureOutcome<GeocodedAddress>;
}

/// Fire-and-forget local notification.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str);
}

/// Fire-and-forget haptic feedback.
pub trait Haptics {
    fn impact(&self);
    fn success(&self);
    fn error(&self);
}

/// Haptics port for hosts without a vibration engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn impact(&self) {}
    fn success(&self) {}
    fn error(&self) {}
}

/// Wall-clock source for `createdAt` stamping.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// `Clock` reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, GeocodedAddress, SystemClock};

    #[test]
    fn format_skips_missing_street() {
        let address = GeocodedAddress {
            street: None,
            city: Some("Paris".to_string()),
            region: Some("Ile-de-France".to_string()),
            country: Some("France".to_string()),
        };
        assert_eq!(address.format(), "Paris, Ile-de-France, France");
    }

    #[test]
    fn format_includes_street_when_present() {
        let address = GeocodedAddress {
            street: Some("Rue de Rivoli".to_string()),
            city: Some("Paris".to_string()),
            region: Some(" ".to_string()),
            country: Some("France".to_string()),
        };
        assert_eq!(address.format(), "Rue de Rivoli, Paris, France");
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
