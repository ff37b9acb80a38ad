// src/bin/fetch_document.rs
//! Fetch, decrypt, and verify the current document of an application
//!
//! Usage: fetch_document <application-id> <output-path> [--check-chain]

use anyhow::{bail, Context, Result};
use license_document_vault::db::{documents_db_conn::open_from_config, find_active_by_application};
use license_document_vault::pinning::ContentId;
use license_document_vault::{load_config, DocumentOrchestrator};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (application_id, output_path) = match args.as_slice() {
        [app, out, ..] => (app.as_str(), out.as_str()),
        _ => bail!("usage: fetch_document <application-id> <output-path> [--check-chain]"),
    };
    let check_chain = args.iter().any(|a| a == "--check-chain");

    let config = load_config();
    let conn = open_from_config(&config.database)
        .context("Failed to open document store (is LDV_DB_KEY set?)")?;

    let record = find_active_by_application(&conn, application_id)?
        .into_iter()
        .next()
        .with_context(|| format!("no active document for application {application_id}"))?;
    info!(
        document_id = record.id,
        cid = %record.content_id,
        file = %record.file_name,
        "found document"
    );

    let orchestrator = DocumentOrchestrator::from_config(config)?;
    let plaintext = orchestrator
        .open(
            &ContentId::new(record.content_id.clone()),
            &record.encryption_key,
            Some(&record.plaintext_hash),
        )
        .await
        .context("retrieval or decryption failed")?;

    std::fs::write(output_path, &plaintext)
        .with_context(|| format!("writing {output_path}"))?;
    info!(bytes = plaintext.len(), output = output_path, "document written");

    if check_chain && orchestrator.registry().is_none() {
        warn!("chain access not configured, skipping on-chain check");
    } else if check_chain {
        if orchestrator.verify_on_chain(application_id, &plaintext).await {
            info!("document hash confirmed on chain");
        } else {
            warn!("document hash NOT confirmed on chain");
        }
    }

    Ok(())
}
