// src/crypto/encrypt.rs
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};

use super::EncryptedBlob;
use crate::aliases::DocumentKey32;
use crate::consts::{AUTH_TAG_LEN, IV_LEN};
use crate::error::CoreError;

/// Encrypt plaintext → AES-256-GCM blob (in-memory)
///
/// Draws a fresh random 96-bit IV on every call, so the same key never sees
/// an IV twice in practice.
pub fn encrypt(plaintext: &[u8], key: &DocumentKey32) -> Result<EncryptedBlob, CoreError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.expose_secret()));
    let iv: [u8; IV_LEN] = rand::random();

    let mut sealed = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|e| CoreError::Crypto(e.to_string()))?;

    // aes-gcm appends the tag to the ciphertext
    let tag_start = sealed.len() - AUTH_TAG_LEN;
    let auth_tag: [u8; AUTH_TAG_LEN] = sealed
        .get(tag_start..)
        .and_then(|t| t.try_into().ok())
        .ok_or_else(|| CoreError::Crypto("cipher output shorter than tag".into()))?;
    sealed.truncate(tag_start);

    Ok(EncryptedBlob {
        iv,
        ciphertext: sealed,
        auth_tag,
    })
}
