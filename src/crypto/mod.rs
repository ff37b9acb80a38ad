// src/crypto/mod.rs
//! Pure cryptographic operations: no I/O, no network
//!
//! All functions work exclusively on in-memory buffers. Blobs use the
//! layout `iv (12) || ciphertext || auth_tag (16)`.
mod blob;
mod decrypt;
mod encrypt;
mod hash;
mod rotate;

pub use blob::EncryptedBlob;
pub use decrypt::decrypt;
pub use encrypt::encrypt;
pub use hash::{access_code_hash, generate_access_code, sha256_hex};
pub use rotate::rotate_key;
