//! Host device capability boundary.
//!
//! # Responsibility
//! - Name the permission-gated device capabilities the diary relies on.
//! - Define the request/response ports the host platform implements
//!   (camera, geolocation, notifications, haptics, clock).
//!
//! # Invariants
//! - Ports never retry; each call yields exactly one `CaptureOutcome`.
//! - Fire-and-forget ports (`Notifier`, `Haptics`) return nothing callers
//!   depend on.

pub mod capability;
pub mod ports;
