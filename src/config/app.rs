// src/config/app.rs
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::defaults::{default_departments, DEFAULT_CONFIG_PATH};
use crate::error::CoreError;

/// Env var naming the TOML file to load
pub const CONFIG_ENV: &str = "LDV_CONFIG";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub pinning: PinningConfig,
    pub chain: ChainConfig,
    pub documents: DocumentsConfig,
    pub database: DatabaseConfig,
    /// license type → department name, layered over the built-in table
    #[serde(default = "default_departments")]
    pub departments: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PinningConfig {
    pub upload_endpoint: String,
    pub jwt: String,
    /// Tried in order; first HTTP 200 wins
    pub gateways: Vec<String>,
    pub upload_timeout_secs: u64,
    pub gateway_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    pub enabled: bool,
    pub rpc_url: String,
    pub contract_address: String,
    pub writer_address: String,
    pub rpc_timeout_secs: u64,
    pub receipt_timeout_secs: u64,
    pub receipt_poll_ms: u64,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub max_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub key: String,
}

impl PinningConfig {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }
}

impl ChainConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Secrets and endpoints that deployments set through the environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt) = std::env::var("LDV_PINATA_JWT") {
            self.pinning.jwt = jwt;
        }
        if let Ok(url) = std::env::var("LDV_RPC_URL") {
            self.chain.rpc_url = url;
        }
        if let Ok(key) = std::env::var("LDV_DB_KEY") {
            self.database.key = key;
        }
        if let Ok(path) = std::env::var("LDV_DB_PATH") {
            self.database.path = path;
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Read `path`, falling back to defaults if missing or invalid, then apply
/// env overrides. Uncached; `load()` is the process-wide entry point.
pub fn load_from<P: AsRef<Path>>(path: P) -> Config {
    let path = path.as_ref();
    let mut conf = if path.exists() {
        Config::from_file(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "invalid config, using built-in defaults");
            Config::default()
        })
    } else {
        warn!(path = %path.display(), "config file not found, using built-in defaults");
        Config::default()
    };

    conf.apply_env_overrides();
    conf
}

/// Load config once per process from `LDV_CONFIG` (or the default path)
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config_path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        load_from(config_path)
    })
}
