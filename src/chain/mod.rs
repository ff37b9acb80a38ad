// src/chain/mod.rs
//! On-chain anchoring of document hashes and access codes
//!
//! Writes from this process are strictly serialized through one
//! [`NonceManager`]; reads go straight to the node and may run concurrently.
//! Nothing here coordinates with other processes using the same writer
//! account.

use async_trait::async_trait;

use crate::error::ChainError;

pub mod abi;
mod nonce;
mod registry;
pub mod rpc;

pub use abi::ContractCall;
pub use nonce::NonceManager;
pub use registry::{AccessCodeStatus, ChainRegistration, IssuedAccessCode, RegistryClient};
pub use rpc::JsonRpcChain;

/// `0x`-prefixed transaction hash as reported by the node
pub type TxHash = String;

/// Minimal view of a chain node holding the writer account
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Transaction count of the writer account, pending transactions included
    async fn pending_nonce(&self) -> Result<u64, ChainError>;

    /// Submit a contract write with an explicit nonce and wait for inclusion
    async fn send_transaction(&self, call: &ContractCall, nonce: u64)
        -> Result<TxHash, ChainError>;

    /// Read-only contract call; returns raw ABI-encoded return data
    async fn call(&self, call: &ContractCall) -> Result<Vec<u8>, ChainError>;
}
