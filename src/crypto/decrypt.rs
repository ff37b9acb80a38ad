// src/crypto/decrypt.rs
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};

use crate::aliases::DocumentKey32;
use crate::consts::{IV_LEN, MIN_BLOB_LEN};
use crate::error::IntegrityError;

/// Decrypt an `iv || ciphertext || tag` blob → plaintext (in-memory)
///
/// Fails closed: a bad tag yields `TagMismatch` and no output at all.
pub fn decrypt(blob: &[u8], key: &DocumentKey32) -> Result<Vec<u8>, IntegrityError> {
    if blob.len() < MIN_BLOB_LEN {
        return Err(IntegrityError::Malformed { len: blob.len() });
    }
    let (iv, sealed) = blob.split_at(IV_LEN);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.expose_secret()));
    cipher
        .decrypt(Nonce::from_slice(iv), sealed)
        .map_err(|_| IntegrityError::TagMismatch)
}
