// src/error.rs
//! Public error types for the entire crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Encryption failed: {0}")]
    Crypto(String),

    #[error("Integrity check failed: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("Pinning failed: {0}")]
    Pinning(#[from] PinningError),

    #[error("Chain operation failed: {0}")]
    Chain(#[from] ChainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Bad input, rejected before any I/O happens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file type '{extension}' is not allowed")]
    UnsupportedExtension { extension: String },

    #[error("document is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("document is empty")]
    Empty,

    #[error("invalid document key: {0}")]
    InvalidKey(String),
}

/// Fatal for the blob in question; never retried
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("blob of {len} bytes is too short to hold IV and tag")]
    Malformed { len: usize },

    #[error("authentication tag mismatch (wrong key or tampered data)")]
    TagMismatch,

    #[error("plaintext hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PinningError {
    #[error("upload rejected: {0}")]
    Upload(String),

    #[error("could not retrieve {cid} from any gateway: {}", .attempted.join("; "))]
    Retrieval { cid: String, attempted: Vec<String> },

    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("nonce conflict: {0}")]
    NonceConflict(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("transaction {0} reverted")]
    Reverted(String),

    #[error("no receipt for transaction {0} before timeout")]
    ReceiptTimeout(String),

    #[error("ABI error: {0}")]
    Abi(String),
}

impl ChainError {
    /// Errors that mean our nonce view is stale and a fresh one may succeed
    pub fn is_nonce_conflict(&self) -> bool {
        matches!(self, ChainError::NonceConflict(_))
    }
}
