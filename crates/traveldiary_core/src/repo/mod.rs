//! Repository layer over the key-value medium.
//!
//! # Responsibility
//! - Own the persisted travel entry collection and its identity assignment.
//! - Isolate JSON encoding and medium access from use-case orchestration.
//!
//! # Invariants
//! - Writes validate candidates before touching the medium.
//! - Nothing outside this layer reads or writes `ENTRIES_KEY` directly.

pub mod entry_store;
