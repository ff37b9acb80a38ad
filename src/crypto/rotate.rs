// src/crypto/rotate.rs
use super::{decrypt, encrypt, EncryptedBlob};
use crate::aliases::DocumentKey32;
use crate::error::CoreError;
use crate::key_ops::generate_key;

/// Pure in-memory key rotation: old key → fresh random key
///
/// The plaintext (and therefore its SHA-256) is unchanged; only the blob and
/// the key differ afterwards.
pub fn rotate_key(
    blob: &[u8],
    old_key: &DocumentKey32,
) -> Result<(EncryptedBlob, DocumentKey32), CoreError> {
    let plaintext = decrypt(blob, old_key)?;
    let new_key = generate_key();
    let rotated = encrypt(&plaintext, &new_key)?;
    Ok((rotated, new_key))
}
