// src/chain/registry.rs
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::abi::{self, ContractCall};
use super::{ChainRpc, JsonRpcChain, NonceManager, TxHash};
use crate::config::ChainConfig;
use crate::crypto::{access_code_hash, generate_access_code};
use crate::error::{ChainError, CoreError};
use crate::pinning::ContentId;

/// Contract-side record for one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRegistration {
    pub content_id: String,
    pub document_hash: String,
    pub department_id: String,
    /// Block timestamp (unix seconds) of the registration
    pub timestamp: u64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCodeStatus {
    pub exists: bool,
    pub is_used: bool,
    pub department_id: String,
}

/// A freshly issued access code. `code` goes to the applicant; only its hash
/// was written on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAccessCode {
    pub code: String,
    pub tx_hash: TxHash,
}

/// Typed front for the document registry contract
#[derive(Clone)]
pub struct RegistryClient {
    rpc: Arc<dyn ChainRpc>,
    nonces: Arc<NonceManager>,
}

impl RegistryClient {
    pub fn new(rpc: Arc<dyn ChainRpc>, nonces: NonceManager) -> Self {
        Self {
            rpc,
            nonces: Arc::new(nonces),
        }
    }

    pub fn from_config(config: &ChainConfig) -> Result<Self, CoreError> {
        let rpc = JsonRpcChain::new(config)?;
        info!(
            rpc_url = %config.rpc_url,
            contract = %rpc.contract(),
            writer = %rpc.writer(),
            "registry client configured"
        );
        Ok(Self::new(
            Arc::new(rpc),
            NonceManager::new(config.retry_delay()),
        ))
    }

    pub fn nonce_manager(&self) -> &NonceManager {
        &self.nonces
    }

    async fn write(&self, call: ContractCall) -> Result<TxHash, ChainError> {
        let rpc = self.rpc.as_ref();
        let result = self
            .nonces
            .submit(rpc, |nonce| rpc.send_transaction(&call, nonce))
            .await;

        match &result {
            Ok(tx_hash) => info!(
                method = call.method(),
                application_id = call.application_id(),
                %tx_hash,
                "chain write recorded"
            ),
            Err(e) => warn!(
                method = call.method(),
                application_id = call.application_id(),
                error = %e,
                "chain write failed"
            ),
        }
        result
    }

    /// Reads never fail outward; a broken node looks like "nothing there"
    async fn read_or<T>(
        &self,
        call: ContractCall,
        decode: fn(&[u8]) -> Result<T, ChainError>,
        fallback: T,
    ) -> T {
        match self.rpc.call(&call).await.and_then(|data| decode(&data)) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    method = call.method(),
                    application_id = call.application_id(),
                    error = %e,
                    "chain read failed, using default"
                );
                fallback
            }
        }
    }

    pub async fn share_document_with_department(
        &self,
        application_id: &str,
        encrypted_cid: &ContentId,
        document_hash: &str,
        department_id: &str,
    ) -> Result<TxHash, ChainError> {
        self.write(ContractCall::ShareDocument {
            application_id: application_id.to_string(),
            encrypted_cid: encrypted_cid.to_string(),
            document_hash: document_hash.to_string(),
            department_id: department_id.to_string(),
        })
        .await
    }

    pub async fn issue_access_code(
        &self,
        application_id: &str,
    ) -> Result<IssuedAccessCode, ChainError> {
        let code = generate_access_code();
        let tx_hash = self
            .write(ContractCall::IssueAccessCode {
                application_id: application_id.to_string(),
                access_code_hash: access_code_hash(&code),
            })
            .await?;
        Ok(IssuedAccessCode { code, tx_hash })
    }

    pub async fn deactivate_document(&self, application_id: &str) -> Result<TxHash, ChainError> {
        self.write(ContractCall::Deactivate {
            application_id: application_id.to_string(),
        })
        .await
    }

    /// CID unlocked by an access code, if the contract knows one
    pub async fn document_cid(&self, application_id: &str, access_code: &str) -> Option<ContentId> {
        let call = ContractCall::DocumentCid {
            application_id: application_id.to_string(),
            access_code_hash: access_code_hash(access_code),
        };
        let cid = self.read_or(call, abi::decode_string, String::new()).await;
        (!cid.is_empty()).then(|| ContentId::new(cid))
    }

    pub async fn verify_document(&self, application_id: &str, document_hash: &str) -> bool {
        let call = ContractCall::VerifyDocument {
            application_id: application_id.to_string(),
            document_hash: document_hash.to_string(),
        };
        self.read_or(call, abi::decode_bool, false).await
    }

    pub async fn document_info(&self, application_id: &str) -> Option<ChainRegistration> {
        let call = ContractCall::DocumentInfo {
            application_id: application_id.to_string(),
        };
        self.read_or(call, |d| abi::decode_document_info(d).map(Some), None)
            .await
            .filter(|info| !info.content_id.is_empty())
    }

    pub async fn check_access_code(&self, application_id: &str) -> AccessCodeStatus {
        let call = ContractCall::CheckAccessCode {
            application_id: application_id.to_string(),
        };
        self.read_or(call, abi::decode_access_code_status, AccessCodeStatus::default())
            .await
    }
}
