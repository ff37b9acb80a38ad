// src/pinning/mod.rs
//! Content-addressed storage for encrypted blobs
//!
//! Blobs are opaque here: whatever bytes the orchestrator hands over are
//! pinned as-is, and reads come back byte-for-byte from the first gateway
//! that answers.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PinningError;

mod metadata;
mod pinata;

pub use metadata::{PinMetadata, TagValue};
pub use pinata::PinataClient;

/// Address of a blob in the content-addressed network
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Pinning provider seen from the orchestrator
#[async_trait]
pub trait PinStore: Send + Sync {
    /// Pin `blob` under `name`. Provider errors come back as-is; nothing is
    /// retried at this layer.
    async fn store(
        &self,
        blob: Vec<u8>,
        name: &str,
        tags: &BTreeMap<String, TagValue>,
    ) -> Result<ContentId, PinningError>;

    /// Fetch a blob by CID, uncached.
    async fn retrieve(&self, cid: &ContentId) -> Result<Vec<u8>, PinningError>;
}
