// src/pinning/pinata.rs
use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{ContentId, PinMetadata, PinStore, TagValue};
use crate::config::PinningConfig;
use crate::error::PinningError;

/// Pinata-compatible pinning client with gateway fallback for reads
#[derive(Debug, Clone)]
pub struct PinataClient {
    http: reqwest::Client,
    upload_endpoint: String,
    jwt: String,
    gateways: Vec<String>,
    upload_timeout: Duration,
    gateway_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pin_size: u64,
}

impl PinataClient {
    pub fn new(config: &PinningConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &PinningConfig) -> Self {
        Self {
            http,
            upload_endpoint: config.upload_endpoint.clone(),
            jwt: config.jwt.clone(),
            gateways: config
                .gateways
                .iter()
                .map(|g| g.trim_end_matches('/').to_string())
                .collect(),
            upload_timeout: config.upload_timeout(),
            gateway_timeout: config.gateway_timeout(),
        }
    }

    pub fn gateways(&self) -> &[String] {
        &self.gateways
    }
}

/// Pull the provider's own message out of an error body, falling back to the
/// raw body text.
fn provider_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("error") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(obj @ serde_json::Value::Object(_)) => obj
                .get("details")
                .or_else(|| obj.get("reason"))
                .and_then(|d| d.as_str())
                .map(str::to_string),
            _ => None,
        })
        .unwrap_or_else(|| body.trim().to_string());
    format!("{status}: {detail}")
}

#[async_trait]
impl PinStore for PinataClient {
    async fn store(
        &self,
        blob: Vec<u8>,
        name: &str,
        tags: &BTreeMap<String, TagValue>,
    ) -> Result<ContentId, PinningError> {
        let size = blob.len();
        let metadata = serde_json::to_string(&PinMetadata {
            name,
            keyvalues: tags,
        })
        .map_err(|e| PinningError::Upload(e.to_string()))?;

        let part = Part::bytes(blob)
            .file_name(name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| PinningError::Upload(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", metadata);

        debug!(name, size, endpoint = %self.upload_endpoint, "pinning blob");
        let response = self
            .http
            .post(&self.upload_endpoint)
            .bearer_auth(&self.jwt)
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await
            .map_err(|e| PinningError::Upload(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PinningError::Upload(e.to_string()))?;
        if !status.is_success() {
            return Err(PinningError::Upload(provider_message(status, &body)));
        }

        let pinned: PinResponse = serde_json::from_str(&body)
            .map_err(|e| PinningError::InvalidResponse(format!("{e}: {body}")))?;
        if pinned.ipfs_hash.is_empty() {
            return Err(PinningError::InvalidResponse(
                "response carried an empty IpfsHash".into(),
            ));
        }

        info!(cid = %pinned.ipfs_hash, pin_size = pinned.pin_size, "blob pinned");
        Ok(ContentId::new(pinned.ipfs_hash))
    }

    async fn retrieve(&self, cid: &ContentId) -> Result<Vec<u8>, PinningError> {
        let mut attempted = Vec::with_capacity(self.gateways.len());

        for gateway in &self.gateways {
            let url = format!("{gateway}/{cid}");
            let outcome = match self
                .http
                .get(&url)
                .timeout(self.gateway_timeout)
                .send()
                .await
            {
                Ok(resp) if resp.status() == StatusCode::OK => {
                    resp.bytes().await.map(|b| b.to_vec()).map_err(|e| e.to_string())
                }
                Ok(resp) => Err(format!("HTTP {}", resp.status())),
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(bytes) => {
                    debug!(%cid, gateway = %gateway, len = bytes.len(), "retrieved blob");
                    return Ok(bytes);
                }
                Err(reason) => {
                    warn!(%cid, gateway = %gateway, %reason, "gateway failed, trying next");
                    attempted.push(format!("{gateway} ({reason})"));
                }
            }
        }

        Err(PinningError::Retrieval {
            cid: cid.to_string(),
            attempted,
        })
    }
}
