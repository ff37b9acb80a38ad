// src/config/defaults.rs
use std::collections::BTreeMap;

use crate::config::app::{ChainConfig, DatabaseConfig, DocumentsConfig, PinningConfig};
use crate::consts::{
    ALLOWED_EXTENSIONS, DEFAULT_GATEWAYS, DEFAULT_GATEWAY_TIMEOUT_SECS, DEFAULT_PIN_ENDPOINT,
    DEFAULT_RECEIPT_POLL_MS, DEFAULT_RECEIPT_TIMEOUT_SECS, DEFAULT_RPC_TIMEOUT_SECS,
    DEFAULT_UPLOAD_TIMEOUT_SECS, MAX_DOCUMENT_BYTES, NONCE_RETRY_DELAY_MS,
};

pub const DEFAULT_CONFIG_PATH: &str = "license-vault.toml";
pub const DEFAULT_DB_PATH: &str = "data/documents.db";
pub const DEFAULT_DB_KEY: &str = "dev-documents-password-2025";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            upload_endpoint: DEFAULT_PIN_ENDPOINT.into(),
            jwt: String::new(),
            gateways: DEFAULT_GATEWAYS.iter().map(|g| g.to_string()).collect(),
            upload_timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
            gateway_timeout_secs: DEFAULT_GATEWAY_TIMEOUT_SECS,
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rpc_url: DEFAULT_RPC_URL.into(),
            contract_address: String::new(),
            writer_address: String::new(),
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
            receipt_poll_ms: DEFAULT_RECEIPT_POLL_MS,
            retry_delay_ms: NONCE_RETRY_DELAY_MS,
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_DOCUMENT_BYTES,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DB_PATH.into(),
            key: DEFAULT_DB_KEY.into(),
        }
    }
}

/// Extra license-type → department rows; the built-in table covers the rest
pub fn default_departments() -> BTreeMap<String, String> {
    BTreeMap::new()
}
