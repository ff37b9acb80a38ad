// src/crypto/hash.rs
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::consts::{ACCESS_CODE_ALPHABET, ACCESS_CODE_LEN};

/// SHA-256 → lowercase hex (64 chars)
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hash of an access code as it is recorded on chain. The raw code never
/// leaves this process.
pub fn access_code_hash(code: &str) -> String {
    sha256_hex(code.trim().to_ascii_uppercase().as_bytes())
}

/// Random code handed to the applicant for sharing a document with a department
pub fn generate_access_code() -> String {
    let mut rng = rand::rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ACCESS_CODE_ALPHABET.len());
            ACCESS_CODE_ALPHABET.get(idx).copied().unwrap_or(b'A') as char
        })
        .collect()
}
