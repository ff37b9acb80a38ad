// src/config/mod.rs
//! Configuration system for license-document-vault
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{
    load, load_from, ChainConfig, Config, DatabaseConfig, DocumentsConfig, PinningConfig,
    CONFIG_ENV,
};

mod app;
mod defaults;
