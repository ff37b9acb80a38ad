// tests/support.rs
//! Test doubles: in-memory pinning network and a scripted chain node

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use license_document_vault::chain::abi::{
    encode_access_code_status_return, encode_bool_return, encode_document_info_return,
    encode_string_return,
};
use license_document_vault::chain::{
    AccessCodeStatus, ChainRegistration, ChainRpc, ContractCall, NonceManager, RegistryClient,
    TxHash,
};
use license_document_vault::config::DocumentsConfig;
use license_document_vault::departments::DepartmentDirectory;
use license_document_vault::error::{ChainError, PinningError};
use license_document_vault::pinning::{ContentId, PinStore, TagValue};
use license_document_vault::{sha256_hex, DocumentOrchestrator};
use rusqlite::Connection;
use tempfile::TempDir;

// ──────────────────────────────────────────────────────────────
// Pinning
// ──────────────────────────────────────────────────────────────

/// Content-addressed store held in memory; counts every upload attempt
#[derive(Default)]
#[allow(dead_code)]
pub struct MemoryPinStore {
    blobs: Mutex<HashMap<ContentId, Vec<u8>>>,
    tags: Mutex<HashMap<ContentId, BTreeMap<String, TagValue>>>,
    store_calls: AtomicUsize,
    fail_uploads: AtomicBool,
}

#[allow(dead_code)]
impl MemoryPinStore {
    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn blob(&self, cid: &ContentId) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(cid).cloned()
    }

    pub fn tags(&self, cid: &ContentId) -> Option<BTreeMap<String, TagValue>> {
        self.tags.lock().unwrap().get(cid).cloned()
    }

    /// Flip one bit of a stored blob in place
    pub fn corrupt(&self, cid: &ContentId, index: usize) {
        let mut blobs = self.blobs.lock().unwrap();
        let blob = blobs.get_mut(cid).expect("blob present");
        blob[index] ^= 0x01;
    }
}

#[async_trait]
impl PinStore for MemoryPinStore {
    async fn store(
        &self,
        blob: Vec<u8>,
        _name: &str,
        tags: &BTreeMap<String, TagValue>,
    ) -> Result<ContentId, PinningError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(PinningError::Upload(
                "503 Service Unavailable: pinning paused".into(),
            ));
        }
        let cid = ContentId::new(format!("bafy{}", &sha256_hex(&blob)[..40]));
        self.blobs.lock().unwrap().insert(cid.clone(), blob);
        self.tags.lock().unwrap().insert(cid.clone(), tags.clone());
        Ok(cid)
    }

    async fn retrieve(&self, cid: &ContentId) -> Result<Vec<u8>, PinningError> {
        self.blob(cid).ok_or_else(|| PinningError::Retrieval {
            cid: cid.to_string(),
            attempted: vec!["memory (not found)".into()],
        })
    }
}

// ──────────────────────────────────────────────────────────────
// Chain
// ──────────────────────────────────────────────────────────────

/// Scripted node + registry contract
///
/// Enforces nonce ordering like a real node: a transaction whose nonce is
/// not exactly the account's next nonce is rejected with "nonce too low".
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeChain {
    account_nonce: Mutex<u64>,
    nonce_queries: AtomicUsize,
    sent: Mutex<Vec<(String, u64)>>,
    send_attempts: AtomicUsize,
    injected_failures: Mutex<VecDeque<ChainError>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    send_delay: Mutex<Duration>,
    fail_reads: AtomicBool,
    registrations: Mutex<HashMap<String, ChainRegistration>>,
    access_codes: Mutex<HashMap<String, (String, bool)>>,
}

#[allow(dead_code)]
impl FakeChain {
    pub fn starting_at(nonce: u64) -> Self {
        let chain = Self::default();
        *chain.account_nonce.lock().unwrap() = nonce;
        chain
    }

    pub fn with_send_delay(self, delay: Duration) -> Self {
        *self.send_delay.lock().unwrap() = delay;
        self
    }

    /// Another process used the writer account behind our back
    pub fn external_transactions(&self, count: u64) {
        *self.account_nonce.lock().unwrap() += count;
    }

    /// Next send attempts fail with these errors, in order
    pub fn inject_failure(&self, err: ChainError) {
        self.injected_failures.lock().unwrap().push_back(err);
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn nonce_queries(&self) -> usize {
        self.nonce_queries.load(Ordering::SeqCst)
    }

    pub fn send_attempts(&self) -> usize {
        self.send_attempts.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// (method, nonce) of every accepted transaction
    pub fn sent(&self) -> Vec<(String, u64)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_nonces(&self) -> Vec<u64> {
        self.sent().into_iter().map(|(_, n)| n).collect()
    }

    pub fn registration(&self, application_id: &str) -> Option<ChainRegistration> {
        self.registrations
            .lock()
            .unwrap()
            .get(application_id)
            .cloned()
    }

    /// Seed contract state directly
    pub fn register(&self, application_id: &str, registration: ChainRegistration) {
        self.registrations
            .lock()
            .unwrap()
            .insert(application_id.to_string(), registration);
    }

    fn apply(&self, call: &ContractCall, nonce: u64) {
        match call {
            ContractCall::ShareDocument {
                application_id,
                encrypted_cid,
                document_hash,
                department_id,
            } => {
                self.registrations.lock().unwrap().insert(
                    application_id.clone(),
                    ChainRegistration {
                        content_id: encrypted_cid.clone(),
                        document_hash: document_hash.clone(),
                        department_id: department_id.clone(),
                        timestamp: 1_700_000_000 + nonce,
                        is_active: true,
                    },
                );
            }
            ContractCall::IssueAccessCode {
                application_id,
                access_code_hash,
            } => {
                self.access_codes
                    .lock()
                    .unwrap()
                    .insert(application_id.clone(), (access_code_hash.clone(), false));
            }
            ContractCall::Deactivate { application_id } => {
                if let Some(reg) = self.registrations.lock().unwrap().get_mut(application_id) {
                    reg.is_active = false;
                }
            }
            _ => {}
        }
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainRpc for FakeChain {
    async fn pending_nonce(&self) -> Result<u64, ChainError> {
        self.nonce_queries.fetch_add(1, Ordering::SeqCst);
        Ok(*self.account_nonce.lock().unwrap())
    }

    async fn send_transaction(
        &self,
        call: &ContractCall,
        nonce: u64,
    ) -> Result<TxHash, ChainError> {
        self.send_attempts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.send_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.injected_failures.lock().unwrap().pop_front() {
            return Err(err);
        }

        {
            let mut account = self.account_nonce.lock().unwrap();
            if nonce != *account {
                return Err(ChainError::NonceConflict(format!(
                    "nonce too low: next nonce {}, tx nonce {nonce}",
                    *account
                )));
            }
            *account += 1;
        }

        self.apply(call, nonce);
        self.sent
            .lock()
            .unwrap()
            .push((call.method().to_string(), nonce));
        Ok(format!("0x{nonce:064x}"))
    }

    async fn call(&self, call: &ContractCall) -> Result<Vec<u8>, ChainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ChainError::Transport("connection refused".into()));
        }
        let registrations = self.registrations.lock().unwrap();
        let access_codes = self.access_codes.lock().unwrap();

        Ok(match call {
            ContractCall::VerifyDocument {
                application_id,
                document_hash,
            } => encode_bool_return(
                registrations
                    .get(application_id)
                    .is_some_and(|r| r.is_active && &r.document_hash == document_hash),
            ),
            ContractCall::DocumentInfo { application_id } => {
                let info = registrations.get(application_id).cloned().unwrap_or(
                    ChainRegistration {
                        content_id: String::new(),
                        document_hash: String::new(),
                        department_id: String::new(),
                        timestamp: 0,
                        is_active: false,
                    },
                );
                encode_document_info_return(&info)
            }
            ContractCall::CheckAccessCode { application_id } => {
                let status = match access_codes.get(application_id) {
                    Some((_, used)) => AccessCodeStatus {
                        exists: true,
                        is_used: *used,
                        department_id: registrations
                            .get(application_id)
                            .map(|r| r.department_id.clone())
                            .unwrap_or_default(),
                    },
                    None => AccessCodeStatus::default(),
                };
                encode_access_code_status_return(&status)
            }
            ContractCall::DocumentCid {
                application_id,
                access_code_hash,
            } => {
                let cid = match access_codes.get(application_id) {
                    Some((hash, _)) if hash == access_code_hash => registrations
                        .get(application_id)
                        .map(|r| r.content_id.clone())
                        .unwrap_or_default(),
                    _ => String::new(),
                };
                encode_string_return(&cid)
            }
            other => {
                return Err(ChainError::Abi(format!(
                    "{} is not a view function",
                    other.method()
                )))
            }
        })
    }
}

// ──────────────────────────────────────────────────────────────
// Wiring
// ──────────────────────────────────────────────────────────────

#[allow(dead_code)]
pub struct Harness {
    pub pins: Arc<MemoryPinStore>,
    pub chain: Arc<FakeChain>,
    pub orchestrator: DocumentOrchestrator,
}

#[allow(dead_code)]
pub fn registry_for(chain: &Arc<FakeChain>) -> RegistryClient {
    RegistryClient::new(
        chain.clone() as Arc<dyn ChainRpc>,
        NonceManager::new(Duration::from_millis(5)),
    )
}

#[allow(dead_code)]
pub fn harness() -> Harness {
    harness_with(DocumentsConfig::default())
}

#[allow(dead_code)]
pub fn harness_with(documents: DocumentsConfig) -> Harness {
    let pins = Arc::new(MemoryPinStore::default());
    let chain = Arc::new(FakeChain::starting_at(7));
    let orchestrator = DocumentOrchestrator::new(
        pins.clone(),
        Some(registry_for(&chain)),
        DepartmentDirectory::builtin(),
        &documents,
    );
    Harness {
        pins,
        chain,
        orchestrator,
    }
}

// ──────────────────────────────────────────────────────────────
// HTTP
// ──────────────────────────────────────────────────────────────

/// Serve `router` on an ephemeral local port; returns its base URL
#[allow(dead_code)]
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

// ──────────────────────────────────────────────────────────────
// Database
// ──────────────────────────────────────────────────────────────

#[allow(dead_code)]
pub struct TestDb {
    pub conn: Connection,
    pub path: PathBuf,
    _dir: TempDir,
}

#[allow(dead_code)]
impl TestDb {
    pub const KEY: &'static str = "test-documents-secret-2025";

    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("documents.db");
        let conn = license_document_vault::db::open_documents_db(&path, Self::KEY)
            .expect("open documents db");
        Self {
            conn,
            path,
            _dir: dir,
        }
    }
}
