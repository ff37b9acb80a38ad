// src/consts.rs
//! Shared constants: cipher parameters and pipeline defaults

/// AES-GCM nonce length (the GCM standard 96-bit IV)
pub const IV_LEN: usize = 12;

/// AES-GCM authentication tag length
pub const AUTH_TAG_LEN: usize = 16;

/// Smallest well-formed blob: IV + tag around an empty ciphertext
pub const MIN_BLOB_LEN: usize = IV_LEN + AUTH_TAG_LEN;

/// 256-bit document keys
pub const KEY_LEN: usize = 32;

/// Upload ceiling enforced before anything reaches the pinning provider
pub const MAX_DOCUMENT_BYTES: u64 = 100 * 1024 * 1024;

/// File types accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "doc", "docx"];

/// Pinata-compatible upload endpoint
pub const DEFAULT_PIN_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";

/// Public gateways, tried in this order on retrieval
pub const DEFAULT_GATEWAYS: &[&str] = &[
    "https://gateway.pinata.cloud/ipfs",
    "https://ipfs.io/ipfs",
    "https://cloudflare-ipfs.com/ipfs",
    "https://dweb.link/ipfs",
];

pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_RECEIPT_POLL_MS: u64 = 1_000;

/// Fixed backoff before the single nonce-conflict retry
pub const NONCE_RETRY_DELAY_MS: u64 = 500;

/// Alphabet for generated access codes (no 0/O, 1/I)
pub const ACCESS_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ACCESS_CODE_LEN: usize = 12;

/// Recommended KDF iterations for the SQLCipher document store
pub const DB_KDF_ITERATIONS: u32 = 256_000;
