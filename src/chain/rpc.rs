// src/chain/rpc.rs
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{ChainRpc, ContractCall, TxHash};
use crate::config::ChainConfig;
use crate::error::{ChainError, CoreError};

/// Node error messages that mean the nonce we used is stale
const NONCE_CONFLICT_MARKERS: &[&str] = &[
    "nonce too low",
    "nonce has already been used",
    "already known",
    "replacement transaction underpriced",
    "replacement fee too low",
    "invalid nonce",
];

/// Ethereum JSON-RPC over HTTP
///
/// The writer key lives on the node (`eth_sendTransaction`); this process
/// only chooses the nonce.
#[derive(Debug)]
pub struct JsonRpcChain {
    http: reqwest::Client,
    rpc_url: String,
    contract: Address,
    writer: Address,
    rpc_timeout: Duration,
    receipt_timeout: Duration,
    poll_interval: Duration,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Receipt {
    status: Option<String>,
}

/// Map a JSON-RPC error onto the retry taxonomy
pub fn classify_rpc_error(code: i64, message: &str) -> ChainError {
    let lower = message.to_ascii_lowercase();
    if NONCE_CONFLICT_MARKERS.iter().any(|m| lower.contains(m)) {
        ChainError::NonceConflict(message.to_string())
    } else {
        ChainError::Rpc {
            code,
            message: message.to_string(),
        }
    }
}

/// Parse a `0x`-prefixed hex quantity
pub fn parse_quantity(raw: &str) -> Result<u64, ChainError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::Transport(format!("bad quantity '{raw}': {e}")))
}

impl JsonRpcChain {
    pub fn new(config: &ChainConfig) -> Result<Self, CoreError> {
        let contract = Address::from_str(&config.contract_address)
            .map_err(|e| CoreError::Config(format!("chain.contract_address: {e}")))?;
        let writer = Address::from_str(&config.writer_address)
            .map_err(|e| CoreError::Config(format!("chain.writer_address: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            rpc_url: config.rpc_url.clone(),
            contract,
            writer,
            rpc_timeout: config.rpc_timeout(),
            receipt_timeout: config.receipt_timeout(),
            poll_interval: config.receipt_poll_interval(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn writer(&self) -> Address {
        self.writer
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .timeout(self.rpc_timeout)
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        // Nodes report JSON-RPC errors with 200 and sometimes with 4xx/5xx
        let parsed: RpcResponse<T> = serde_json::from_str(&text).map_err(|e| {
            ChainError::Transport(format!("{method}: HTTP {status}: {e}: {text}"))
        })?;

        if let Some(err) = parsed.error {
            return Err(classify_rpc_error(err.code, &err.message));
        }
        Ok(parsed.result)
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<(), ChainError> {
        let started = Instant::now();
        loop {
            let receipt: Option<Receipt> = self
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            if let Some(receipt) = receipt {
                return match receipt.status.as_deref() {
                    Some("0x0") => Err(ChainError::Reverted(tx_hash.to_string())),
                    _ => Ok(()),
                };
            }

            if started.elapsed() >= self.receipt_timeout {
                return Err(ChainError::ReceiptTimeout(tx_hash.to_string()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl ChainRpc for JsonRpcChain {
    async fn pending_nonce(&self) -> Result<u64, ChainError> {
        let raw: Option<String> = self
            .request("eth_getTransactionCount", json!([self.writer, "pending"]))
            .await?;
        let raw = raw.ok_or_else(|| ChainError::Transport("empty nonce response".into()))?;
        parse_quantity(&raw)
    }

    async fn send_transaction(
        &self,
        call: &ContractCall,
        nonce: u64,
    ) -> Result<TxHash, ChainError> {
        let tx = json!({
            "from": self.writer,
            "to": self.contract,
            "data": format!("0x{}", hex::encode(call.encode())),
            "nonce": format!("{nonce:#x}"),
        });

        debug!(method = call.method(), nonce, "sending transaction");
        let tx_hash: Option<String> = self.request("eth_sendTransaction", json!([tx])).await?;
        let tx_hash =
            tx_hash.ok_or_else(|| ChainError::Transport("node returned no tx hash".into()))?;

        self.wait_for_receipt(&tx_hash).await?;
        info!(method = call.method(), nonce, %tx_hash, "transaction confirmed");
        Ok(tx_hash)
    }

    async fn call(&self, call: &ContractCall) -> Result<Vec<u8>, ChainError> {
        let request = json!({
            "to": self.contract,
            "data": format!("0x{}", hex::encode(call.encode())),
        });
        let raw: Option<String> = self.request("eth_call", json!([request, "latest"])).await?;
        let raw = raw.unwrap_or_default();
        hex::decode(raw.strip_prefix("0x").unwrap_or(&raw))
            .map_err(|e| ChainError::Abi(format!("{}: {e}", call.method())))
    }
}
