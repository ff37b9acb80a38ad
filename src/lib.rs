// src/lib.rs
//! license-document-vault: encrypted license documents with public anchoring
//!
//! Features:
//! - AES-256-GCM document encryption (`iv || ciphertext || tag`)
//! - IPFS pinning with an ordered gateway fallback for reads
//! - Nonce-serialized contract writes for on-chain document anchoring
//! - SQLCipher-backed document pointer store with key history

pub mod aliases;
pub mod chain;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod db;
pub mod departments;
pub mod export;
pub mod key_ops;
pub mod orchestrator;
pub mod pinning;
pub mod reconcile;

pub mod error;

// Re-export everything users need at the crate root
pub use aliases::DocumentKey32;
pub use chain::{ChainRpc, JsonRpcChain, NonceManager, RegistryClient};
pub use config::load as load_config;
pub use crypto::{decrypt, encrypt, sha256_hex, EncryptedBlob};
pub use error::{ChainError, CoreError, IntegrityError, PinningError, ValidationError};
pub use export::export_to_json;
pub use orchestrator::{DocumentOrchestrator, SubmissionMetadata, SubmitOutcome};
pub use pinning::{ContentId, PinStore, PinataClient, TagValue};

pub type Result<T> = std::result::Result<T, CoreError>;
