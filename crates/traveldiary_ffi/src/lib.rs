//! Flutter bridge crate for the travel diary core.

pub mod api;
