// src/chain/abi.rs
//! Document registry contract ABI
//!
//! Calls are encoded with `alloy-sol-types`; return data is decoded as
//! parameter tuples so single and multi-value returns share one path.

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall, SolValue};

use super::registry::{AccessCodeStatus, ChainRegistration};
use crate::error::ChainError;

sol! {
    interface IDocumentRegistry {
        function shareDocumentWithDepartment(
            string applicationId,
            string encryptedCID,
            string documentHash,
            string departmentId
        ) external;

        function getDocumentCode(string applicationId, string accessCodeHash) external;

        function getDocumentCID(string applicationId, string accessCodeHash)
            external view returns (string cid);

        function verifyDocument(string applicationId, string documentHash)
            external view returns (bool valid);

        function getDocumentInfo(string applicationId)
            external view returns (
                string cid,
                string documentHash,
                string departmentId,
                uint256 timestamp,
                bool isActive
            );

        function checkAccessCode(string applicationId)
            external view returns (bool exists, bool isUsed, string departmentId);

        function deactivateDocument(string applicationId) external;
    }
}

use IDocumentRegistry::{
    checkAccessCodeCall, deactivateDocumentCall, getDocumentCIDCall, getDocumentCodeCall,
    getDocumentInfoCall, shareDocumentWithDepartmentCall, verifyDocumentCall,
};

/// Every contract method this crate touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    ShareDocument {
        application_id: String,
        encrypted_cid: String,
        document_hash: String,
        department_id: String,
    },
    IssueAccessCode {
        application_id: String,
        access_code_hash: String,
    },
    Deactivate {
        application_id: String,
    },
    DocumentCid {
        application_id: String,
        access_code_hash: String,
    },
    VerifyDocument {
        application_id: String,
        document_hash: String,
    },
    DocumentInfo {
        application_id: String,
    },
    CheckAccessCode {
        application_id: String,
    },
}

impl ContractCall {
    pub fn method(&self) -> &'static str {
        match self {
            ContractCall::ShareDocument { .. } => "shareDocumentWithDepartment",
            ContractCall::IssueAccessCode { .. } => "getDocumentCode",
            ContractCall::Deactivate { .. } => "deactivateDocument",
            ContractCall::DocumentCid { .. } => "getDocumentCID",
            ContractCall::VerifyDocument { .. } => "verifyDocument",
            ContractCall::DocumentInfo { .. } => "getDocumentInfo",
            ContractCall::CheckAccessCode { .. } => "checkAccessCode",
        }
    }

    /// Writes need a nonce and go through the queue
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            ContractCall::ShareDocument { .. }
                | ContractCall::IssueAccessCode { .. }
                | ContractCall::Deactivate { .. }
        )
    }

    pub fn application_id(&self) -> &str {
        match self {
            ContractCall::ShareDocument { application_id, .. }
            | ContractCall::IssueAccessCode { application_id, .. }
            | ContractCall::Deactivate { application_id }
            | ContractCall::DocumentCid { application_id, .. }
            | ContractCall::VerifyDocument { application_id, .. }
            | ContractCall::DocumentInfo { application_id }
            | ContractCall::CheckAccessCode { application_id } => application_id,
        }
    }

    /// Selector + ABI-encoded arguments
    pub fn encode(&self) -> Vec<u8> {
        match self.clone() {
            ContractCall::ShareDocument {
                application_id,
                encrypted_cid,
                document_hash,
                department_id,
            } => shareDocumentWithDepartmentCall {
                applicationId: application_id,
                encryptedCID: encrypted_cid,
                documentHash: document_hash,
                departmentId: department_id,
            }
            .abi_encode(),
            ContractCall::IssueAccessCode {
                application_id,
                access_code_hash,
            } => getDocumentCodeCall {
                applicationId: application_id,
                accessCodeHash: access_code_hash,
            }
            .abi_encode(),
            ContractCall::Deactivate { application_id } => deactivateDocumentCall {
                applicationId: application_id,
            }
            .abi_encode(),
            ContractCall::DocumentCid {
                application_id,
                access_code_hash,
            } => getDocumentCIDCall {
                applicationId: application_id,
                accessCodeHash: access_code_hash,
            }
            .abi_encode(),
            ContractCall::VerifyDocument {
                application_id,
                document_hash,
            } => verifyDocumentCall {
                applicationId: application_id,
                documentHash: document_hash,
            }
            .abi_encode(),
            ContractCall::DocumentInfo { application_id } => getDocumentInfoCall {
                applicationId: application_id,
            }
            .abi_encode(),
            ContractCall::CheckAccessCode { application_id } => checkAccessCodeCall {
                applicationId: application_id,
            }
            .abi_encode(),
        }
    }
}

fn abi_err(e: alloy_sol_types::Error) -> ChainError {
    ChainError::Abi(e.to_string())
}

pub fn decode_string(data: &[u8]) -> Result<String, ChainError> {
    let (value,) = <(String,)>::abi_decode_params(data).map_err(abi_err)?;
    Ok(value)
}

pub fn decode_bool(data: &[u8]) -> Result<bool, ChainError> {
    let (value,) = <(bool,)>::abi_decode_params(data).map_err(abi_err)?;
    Ok(value)
}

pub fn decode_document_info(data: &[u8]) -> Result<ChainRegistration, ChainError> {
    let (content_id, document_hash, department_id, timestamp, is_active) =
        <(String, String, String, U256, bool)>::abi_decode_params(data).map_err(abi_err)?;
    Ok(ChainRegistration {
        content_id,
        document_hash,
        department_id,
        timestamp: timestamp.saturating_to::<u64>(),
        is_active,
    })
}

pub fn decode_access_code_status(data: &[u8]) -> Result<AccessCodeStatus, ChainError> {
    let (exists, is_used, department_id) =
        <(bool, bool, String)>::abi_decode_params(data).map_err(abi_err)?;
    Ok(AccessCodeStatus {
        exists,
        is_used,
        department_id,
    })
}

pub fn encode_string_return(value: &str) -> Vec<u8> {
    (value.to_string(),).abi_encode_params()
}

pub fn encode_bool_return(value: bool) -> Vec<u8> {
    (value,).abi_encode_params()
}

pub fn encode_document_info_return(info: &ChainRegistration) -> Vec<u8> {
    (
        info.content_id.clone(),
        info.document_hash.clone(),
        info.department_id.clone(),
        U256::from(info.timestamp),
        info.is_active,
    )
        .abi_encode_params()
}

pub fn encode_access_code_status_return(status: &AccessCodeStatus) -> Vec<u8> {
    (status.exists, status.is_used, status.department_id.clone()).abi_encode_params()
}
