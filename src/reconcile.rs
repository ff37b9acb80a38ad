// src/reconcile.rs
//! Read-only comparison of the document store against the chain
//!
//! A submission whose chain write failed is still active and retrievable;
//! nothing else records that it is unanchored. This report finds those
//! rows. It does not repair them.

use serde::Serialize;
use tracing::{info, warn};

use crate::chain::RegistryClient;
use crate::db::DocumentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnchorGap {
    /// No transaction was ever recorded for this row
    MissingTxHash,
    /// A transaction exists but the contract does not confirm the hash
    NotVerified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnanchoredDocument {
    pub document_id: i64,
    pub application_id: String,
    pub content_id: String,
    pub gap: AnchorGap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub checked: usize,
    pub unanchored: Vec<UnanchoredDocument>,
}

impl ReconcileReport {
    pub fn is_consistent(&self) -> bool {
        self.unanchored.is_empty()
    }
}

/// Check every active record; load them with `db::list_active` first
pub async fn find_unanchored(
    records: &[DocumentRecord],
    registry: &RegistryClient,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for record in records.iter().filter(|r| r.is_active) {
        report.checked += 1;

        let gap = if record.chain_tx_hash.is_none() {
            Some(AnchorGap::MissingTxHash)
        } else if !registry
            .verify_document(&record.application_id, &record.plaintext_hash)
            .await
        {
            Some(AnchorGap::NotVerified)
        } else {
            None
        };

        if let Some(gap) = gap {
            warn!(
                document_id = record.id,
                application_id = %record.application_id,
                ?gap,
                "document not anchored on chain"
            );
            report.unanchored.push(UnanchoredDocument {
                document_id: record.id,
                application_id: record.application_id.clone(),
                content_id: record.content_id.clone(),
                gap,
            });
        }
    }

    info!(
        checked = report.checked,
        unanchored = report.unanchored.len(),
        "reconciliation finished"
    );
    report
}
