// src/db/documents_db_ops.rs
//! Document store operations
//!
//! Rows are never deleted: deactivation flips `is_active`, and key
//! rotation supersedes the previous `document_key_history` version.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::orchestrator::SubmitOutcome;

/// One stored document as persisted by the portal
///
/// `encryption_key` is the base64 document key, kept server-side next to
/// the pointer it unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    pub id: i64,
    pub application_id: String,
    pub department_id: Option<String>,
    pub file_name: String,
    pub content_id: String,
    pub encryption_key: String,
    pub plaintext_hash: String,
    pub size_bytes: u64,
    pub chain_tx_hash: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHistoryEntry {
    pub version: i64,
    pub content_id: String,
    pub encryption_key: String,
    pub created_at: String,
    pub superseded_at: Option<String>,
    pub note: Option<String>,
}

const SELECT_DOCUMENT: &str = r#"
    SELECT id, application_id, department_id, file_name, content_id,
           encryption_key, plaintext_hash, size_bytes, chain_tx_hash,
           is_active, created_at, updated_at
    FROM documents
"#;

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        id: row.get(0)?,
        application_id: row.get(1)?,
        department_id: row.get(2)?,
        file_name: row.get(3)?,
        content_id: row.get(4)?,
        encryption_key: row.get(5)?,
        plaintext_hash: row.get(6)?,
        size_bytes: row.get::<_, i64>(7)? as u64,
        chain_tx_hash: row.get(8)?,
        is_active: row.get::<_, i64>(9)? != 0,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// Persist a submission and open its key history at version 1
pub fn insert_document(
    conn: &mut Connection,
    application_id: &str,
    file_name: &str,
    outcome: &SubmitOutcome,
) -> rusqlite::Result<i64> {
    let tx = conn.transaction()?;
    tx.execute(
        r#"
        INSERT INTO documents (
            application_id, department_id, file_name, content_id,
            encryption_key, plaintext_hash, size_bytes, chain_tx_hash
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            application_id,
            outcome.department,
            file_name,
            outcome.content_id.as_str(),
            outcome.encryption_key_b64,
            outcome.plaintext_hash,
            outcome.size_bytes as i64,
            outcome.chain_tx_hash,
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.execute(
        "INSERT INTO document_key_history (document_id, version, content_id, encryption_key, note)
         VALUES (?1, 1, ?2, ?3, 'initial')",
        params![id, outcome.content_id.as_str(), outcome.encryption_key_b64],
    )?;
    tx.commit()?;
    Ok(id)
}

pub fn get_document(conn: &Connection, id: i64) -> rusqlite::Result<Option<DocumentRecord>> {
    conn.query_row(
        &format!("{SELECT_DOCUMENT} WHERE id = ?1"),
        [id],
        row_to_record,
    )
    .optional()
}

/// Newest first
pub fn find_active_by_application(
    conn: &Connection,
    application_id: &str,
) -> rusqlite::Result<Vec<DocumentRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DOCUMENT} WHERE application_id = ?1 AND is_active = 1 ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map([application_id], row_to_record)?;
    rows.collect()
}

pub fn list_active(conn: &Connection) -> rusqlite::Result<Vec<DocumentRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_DOCUMENT} WHERE is_active = 1 ORDER BY id"))?;
    let rows = stmt.query_map([], row_to_record)?;
    rows.collect()
}

pub fn list_all(conn: &Connection) -> rusqlite::Result<Vec<DocumentRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_DOCUMENT} ORDER BY id"))?;
    let rows = stmt.query_map([], row_to_record)?;
    rows.collect()
}

/// Late chain anchoring; returns false if no such document
pub fn set_chain_tx_hash(conn: &Connection, id: i64, tx_hash: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE documents SET chain_tx_hash = ?2, updated_at = datetime('now') WHERE id = ?1",
        params![id, tx_hash],
    )?;
    Ok(changed > 0)
}

pub fn mark_inactive(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE documents SET is_active = 0, updated_at = datetime('now')
         WHERE id = ?1 AND is_active = 1",
        [id],
    )?;
    Ok(changed > 0)
}

/// Point a document at its re-encrypted blob and supersede the old key
///
/// The chain anchor referenced the old CID, so `chain_tx_hash` is cleared.
pub fn record_rotation(
    conn: &mut Connection,
    id: i64,
    new_content_id: &str,
    new_key_b64: &str,
    note: Option<&str>,
) -> rusqlite::Result<i64> {
    let tx = conn.transaction()?;
    let current_version: i64 = tx.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM document_key_history WHERE document_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    if current_version == 0 {
        return Err(rusqlite::Error::QueryReturnedNoRows);
    }
    let new_version = current_version + 1;

    tx.execute(
        "UPDATE document_key_history SET superseded_at = datetime('now')
         WHERE document_id = ?1 AND version = ?2",
        params![id, current_version],
    )?;
    tx.execute(
        "INSERT INTO document_key_history (document_id, version, content_id, encryption_key, note)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            new_version,
            new_content_id,
            new_key_b64,
            note.unwrap_or("rotation")
        ],
    )?;
    tx.execute(
        "UPDATE documents
         SET content_id = ?2, encryption_key = ?3, chain_tx_hash = NULL,
             updated_at = datetime('now')
         WHERE id = ?1",
        params![id, new_content_id, new_key_b64],
    )?;
    tx.commit()?;
    Ok(new_version)
}

pub fn key_history(conn: &Connection, id: i64) -> rusqlite::Result<Vec<KeyHistoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT version, content_id, encryption_key, created_at, superseded_at, note
         FROM document_key_history WHERE document_id = ?1 ORDER BY version",
    )?;
    let rows = stmt.query_map([id], |row| {
        Ok(KeyHistoryEntry {
            version: row.get(0)?,
            content_id: row.get(1)?,
            encryption_key: row.get(2)?,
            created_at: row.get(3)?,
            superseded_at: row.get(4)?,
            note: row.get(5)?,
        })
    })?;
    rows.collect()
}
