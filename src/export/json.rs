// src/export/json.rs
use std::path::Path;

use chrono::Utc;
use rusqlite::Connection;
use serde_json::json;
use tracing::{info, warn};

use crate::db::list_all;
use crate::error::CoreError;

/// Export every document pointer (active or not) with its key to JSON.
///
/// SECURITY WARNING: the file holds every document key in cleartext.
pub fn export_to_json<P: AsRef<Path>>(conn: &Connection, path: P) -> Result<usize, CoreError> {
    let records = list_all(conn)?;

    let documents: Vec<_> = records
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "application_id": r.application_id,
                "department_id": r.department_id,
                "file_name": r.file_name,
                "content_id": r.content_id,
                "encryption_key_base64": r.encryption_key,
                "plaintext_sha256": r.plaintext_hash,
                "size_bytes": r.size_bytes,
                "chain_tx_hash": r.chain_tx_hash,
                "is_active": r.is_active,
                "created_at": r.created_at,
                "updated_at": r.updated_at,
            })
        })
        .collect();

    let export = json!({
        "export_format": "license-document-vault-v1",
        "exported_at": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        "exporter_version": env!("CARGO_PKG_VERSION"),
        "total_documents": documents.len(),
        "warning": "THIS FILE CONTAINS ALL DOCUMENT KEYS IN PLAINTEXT. ENCRYPT OR DELETE IMMEDIATELY AFTER USE.",
        "documents": documents
    });

    std::fs::write(path.as_ref(), serde_json::to_string_pretty(&export)?)?;
    info!(count = documents.len(), path = %path.as_ref().display(), "exported documents");
    warn!("export file contains document keys in cleartext");

    Ok(documents.len())
}
