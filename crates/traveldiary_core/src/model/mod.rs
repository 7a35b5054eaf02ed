//! Travel diary domain model.
//!
//! # Responsibility
//! - Define the persisted `TravelEntry` record and its pre-save shapes.
//! - Provide the pure validation helper used before every save.
//!
//! # Invariants
//! - Entries are immutable once stored; only deletion changes the set.
//! - `createdAt` is the only ordering key.

pub mod entry;
pub mod validation;
