// src/orchestrator/types.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chain::TxHash;
use crate::pinning::{ContentId, TagValue};

/// Caller-supplied context for one upload
#[derive(Debug, Clone, Default)]
pub struct SubmissionMetadata {
    pub application_id: String,
    pub license_type: String,
    /// Extra pin tags; the orchestrator adds its own on top
    pub tags: BTreeMap<String, TagValue>,
}

impl SubmissionMetadata {
    pub fn new(application_id: impl Into<String>, license_type: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            license_type: license_type.into(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Everything the caller must persist for a stored document
///
/// A `None` tx hash is a successful upload that is not anchored on chain;
/// callers have to check it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub content_id: ContentId,
    pub encryption_key_b64: String,
    pub plaintext_hash: String,
    pub chain_tx_hash: Option<TxHash>,
    pub department: Option<String>,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationOutcome {
    pub content_id: ContentId,
    pub encryption_key_b64: String,
    pub plaintext_hash: String,
}
