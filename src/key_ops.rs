// src/key_ops.rs
//! Key generation and representation utilities
//!
//! Document keys are generated here and moved between their raw form and
//! the base64 text that is handed back to callers and persisted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::aliases::{DocumentKey32, RandomDocumentKey32, SecureConversionsExt, SecureRandomExt};
use crate::consts::KEY_LEN;
use crate::error::ValidationError;

pub type Key = DocumentKey32;

/// Generate a new random 256-bit document key
#[inline]
pub fn generate_key() -> Key {
    Key::new(**RandomDocumentKey32::new())
}

/// Standard base64 with padding, always 44 characters for a 32-byte key
pub fn key_to_base64(key: &Key) -> String {
    STANDARD.encode(key.expose_secret())
}

pub fn key_from_base64(encoded: &str) -> Result<Key, ValidationError> {
    let raw = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ValidationError::InvalidKey(e.to_string()))?;
    let bytes: [u8; KEY_LEN] = raw.try_into().map_err(|v: Vec<u8>| {
        ValidationError::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", v.len()))
    })?;
    Ok(Key::new(bytes))
}

/// Multiple string representations of a key for export/display
#[derive(Debug, Clone)]
pub struct KeyRepr {
    pub hex: String,
    pub base64: String,
}

pub fn key_representations(key: &Key) -> KeyRepr {
    KeyRepr {
        hex: key.expose_secret().to_hex(),
        base64: key_to_base64(key),
    }
}
