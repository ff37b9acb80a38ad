// src/orchestrator/mod.rs
//! Document pipeline: validate → encrypt → pin → hash → anchor
//!
//! Pinning failures abort a submission. Chain failures do not: the document
//! is already on the pinning network by then, so the outcome reports
//! `chain_tx_hash: None` and the gap is left for `reconcile` to surface.

mod submit;
mod types;

pub use submit::DocumentOrchestrator;
pub use types::{RotationOutcome, SubmissionMetadata, SubmitOutcome};
