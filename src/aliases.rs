// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout the vault.

pub use secure_gate::{fixed_alias, random_alias, SecureConversionsExt, SecureRandomExt};

// Fixed-size secrets
fixed_alias!(DocumentKey32, 32); // 256-bit AES-GCM document key

// Random secrets
random_alias!(RandomDocumentKey32, 32); // fresh key material from the OS RNG
