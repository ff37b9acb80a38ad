// src/crypto/blob.rs
use crate::consts::{AUTH_TAG_LEN, IV_LEN, MIN_BLOB_LEN};
use crate::error::IntegrityError;

/// Ciphertext artifact as stored off-chain
///
/// Immutable once produced: re-encrypting a document always yields a new
/// blob (fresh IV) and therefore a new content identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
    pub auth_tag: [u8; AUTH_TAG_LEN],
}

impl EncryptedBlob {
    /// Split a stored blob into its parts. Anything shorter than IV + tag is
    /// rejected here, before a cipher is ever constructed.
    pub fn from_bytes(data: &[u8]) -> Result<Self, IntegrityError> {
        if data.len() < MIN_BLOB_LEN {
            return Err(IntegrityError::Malformed { len: data.len() });
        }
        let (iv, rest) = data.split_at(IV_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - AUTH_TAG_LEN);

        let iv: [u8; IV_LEN] = iv
            .try_into()
            .map_err(|_| IntegrityError::Malformed { len: data.len() })?;
        let auth_tag: [u8; AUTH_TAG_LEN] = tag
            .try_into()
            .map_err(|_| IntegrityError::Malformed { len: data.len() })?;

        Ok(Self {
            iv,
            ciphertext: ciphertext.to_vec(),
            auth_tag,
        })
    }

    /// `iv || ciphertext || auth_tag`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.auth_tag);
        out
    }

    pub fn encoded_len(&self) -> usize {
        IV_LEN + self.ciphertext.len() + AUTH_TAG_LEN
    }

    pub fn iv_hex(&self) -> String {
        hex::encode(self.iv)
    }
}
