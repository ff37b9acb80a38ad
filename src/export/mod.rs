// src/export/mod.rs
//! Export utilities for license-document-vault
//!
//! Exports include document keys in cleartext; warn users heavily.

pub use json::export_to_json;

pub mod json;
