// src/db/documents_db_conn.rs
use std::{fs, path::Path};

use rusqlite::{Connection, Result};

use crate::config::DatabaseConfig;
use crate::consts::DB_KDF_ITERATIONS;

/// Open (and create if needed) the encrypted document store
pub fn open_documents_db<P: AsRef<Path>>(db_path: P, key: &str) -> Result<Connection> {
    if let Some(parent) = db_path.as_ref().parent() {
        let _ = fs::create_dir_all(parent);
    }

    let conn = Connection::open(db_path.as_ref())?;

    conn.pragma_update(None, "key", key)?;
    conn.execute_batch(&format!(
        r#"
        PRAGMA cipher_page_size = 4096;
        PRAGMA kdf_iter = {DB_KDF_ITERATIONS};
        PRAGMA cipher_hmac_algorithm = HMAC_SHA512;
        PRAGMA cipher_kdf_algorithm = PBKDF2_HMAC_SHA512;
        PRAGMA cipher_plaintext_header_size = 0;

        CREATE TABLE IF NOT EXISTS documents (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            application_id TEXT NOT NULL,
            department_id  TEXT,
            file_name      TEXT NOT NULL,
            content_id     TEXT NOT NULL,
            encryption_key TEXT NOT NULL,
            plaintext_hash TEXT NOT NULL,
            size_bytes     INTEGER NOT NULL,
            chain_tx_hash  TEXT,
            is_active      INTEGER NOT NULL DEFAULT 1,
            created_at     TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_documents_application ON documents(application_id);
        CREATE INDEX IF NOT EXISTS idx_documents_content_id ON documents(content_id);

        CREATE TABLE IF NOT EXISTS document_key_history (
            document_id    INTEGER NOT NULL,
            version        INTEGER NOT NULL,
            content_id     TEXT NOT NULL,
            encryption_key TEXT NOT NULL,
            created_at     TEXT NOT NULL DEFAULT (datetime('now')),
            superseded_at  TEXT,
            note           TEXT,
            PRIMARY KEY (document_id, version)
        );
        "#
    ))?;

    Ok(conn)
}

/// `open_documents_db` with the configured path and key
pub fn open_from_config(config: &DatabaseConfig) -> Result<Connection> {
    open_documents_db(&config.path, &config.key)
}
