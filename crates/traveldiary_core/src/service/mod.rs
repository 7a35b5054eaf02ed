//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate device ports and the entry store into screen-level flows.
//! - Keep UI/FFI layers decoupled from storage and device details.

pub mod diary_service;
pub mod entry_service;
