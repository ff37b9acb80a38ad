// src/orchestrator/submit.rs
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{RotationOutcome, SubmissionMetadata, SubmitOutcome};
use crate::chain::{AccessCodeStatus, ChainRegistration, IssuedAccessCode, RegistryClient};
use crate::config::{Config, DocumentsConfig};
use crate::crypto::{decrypt, encrypt, rotate_key, sha256_hex};
use crate::departments::DepartmentDirectory;
use crate::error::{ChainError, CoreError, IntegrityError, ValidationError};
use crate::key_ops::{generate_key, key_from_base64, key_to_base64};
use crate::pinning::{ContentId, PinStore, PinataClient, TagValue};
use crate::Result;

/// Composes crypto, pinning, and the registry contract
pub struct DocumentOrchestrator {
    pins: Arc<dyn PinStore>,
    registry: Option<RegistryClient>,
    departments: DepartmentDirectory,
    max_bytes: u64,
    allowed_extensions: Vec<String>,
}

impl DocumentOrchestrator {
    pub fn new(
        pins: Arc<dyn PinStore>,
        registry: Option<RegistryClient>,
        departments: DepartmentDirectory,
        documents: &DocumentsConfig,
    ) -> Self {
        Self {
            pins,
            registry,
            departments,
            max_bytes: documents.max_bytes,
            allowed_extensions: documents
                .allowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Production wiring: Pinata client, JSON-RPC registry when enabled
    ///
    /// A chain section without contract or writer address counts as disabled;
    /// documents stay retrievable, they just are not anchored.
    pub fn from_config(config: &Config) -> Result<Self> {
        let pins = Arc::new(PinataClient::new(&config.pinning));
        let chain = &config.chain;
        let registry = if !chain.enabled {
            None
        } else if chain.contract_address.trim().is_empty()
            || chain.writer_address.trim().is_empty()
        {
            warn!(
                rpc_url = %chain.rpc_url,
                "chain enabled but contract or writer address is unset, anchoring disabled"
            );
            None
        } else {
            Some(RegistryClient::from_config(chain)?)
        };
        Ok(Self::new(
            pins,
            registry,
            DepartmentDirectory::with_overrides(&config.departments),
            &config.documents,
        ))
    }

    pub fn registry(&self) -> Option<&RegistryClient> {
        self.registry.as_ref()
    }

    /// Extension allow-list and size ceiling; no I/O
    pub fn validate(&self, filename: &str, size: u64) -> std::result::Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::UnsupportedExtension { extension });
        }
        if size == 0 {
            return Err(ValidationError::Empty);
        }
        if size > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    pub async fn submit(
        &self,
        document: &[u8],
        filename: &str,
        metadata: &SubmissionMetadata,
    ) -> Result<SubmitOutcome> {
        let size_bytes = document.len() as u64;
        self.validate(filename, size_bytes)?;

        let key = generate_key();
        let blob = encrypt(document, &key)?;
        debug!(
            application_id = %metadata.application_id,
            iv = %blob.iv_hex(),
            "document encrypted"
        );

        let mut tags: BTreeMap<String, TagValue> = metadata.tags.clone();
        tags.insert(
            "applicationId".into(),
            metadata.application_id.as_str().into(),
        );
        tags.insert("licenseType".into(), metadata.license_type.as_str().into());
        tags.insert("encrypted".into(), true.into());

        let content_id = self.pins.store(blob.to_bytes(), filename, &tags).await?;
        let plaintext_hash = sha256_hex(document);

        let department = self
            .departments
            .department_for(&metadata.license_type)
            .map(str::to_string);

        let chain_tx_hash = match &department {
            None => {
                warn!(
                    application_id = %metadata.application_id,
                    license_type = %metadata.license_type,
                    "no department for license type, skipping chain registration"
                );
                None
            }
            Some(department) => {
                self.anchor(metadata, &content_id, &plaintext_hash, department)
                    .await
            }
        };

        info!(
            application_id = %metadata.application_id,
            cid = %content_id,
            anchored = chain_tx_hash.is_some(),
            "document submitted"
        );

        Ok(SubmitOutcome {
            content_id,
            encryption_key_b64: key_to_base64(&key),
            plaintext_hash,
            chain_tx_hash,
            department,
            size_bytes,
        })
    }

    /// Chain registration; failure is logged and reported as `None`
    async fn anchor(
        &self,
        metadata: &SubmissionMetadata,
        content_id: &ContentId,
        plaintext_hash: &str,
        department: &str,
    ) -> Option<String> {
        let Some(registry) = &self.registry else {
            warn!(
                application_id = %metadata.application_id,
                "chain disabled, document not anchored"
            );
            return None;
        };

        registry
            .share_document_with_department(
                &metadata.application_id,
                content_id,
                plaintext_hash,
                department,
            )
            .await
            .map_err(|e| {
                warn!(
                    application_id = %metadata.application_id,
                    cid = %content_id,
                    error = %e,
                    "chain registration failed, document stored without anchor"
                );
            })
            .ok()
    }

    /// Retrieve, decrypt, and (optionally) check the plaintext hash
    pub async fn open(
        &self,
        content_id: &ContentId,
        key_b64: &str,
        expected_hash: Option<&str>,
    ) -> Result<Vec<u8>> {
        let key = key_from_base64(key_b64)?;
        let blob = self.pins.retrieve(content_id).await?;
        let plaintext = decrypt(&blob, &key)?;

        if let Some(expected) = expected_hash {
            let actual = sha256_hex(&plaintext);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(IntegrityError::HashMismatch {
                    expected: expected.to_string(),
                    actual,
                }
                .into());
            }
        }
        Ok(plaintext)
    }

    /// Re-encrypt a stored document under a fresh key and pin the new blob
    ///
    /// The old blob stays pinned; the caller decides when to stop using it.
    pub async fn rotate(
        &self,
        content_id: &ContentId,
        key_b64: &str,
        filename: &str,
        tags: &BTreeMap<String, TagValue>,
    ) -> Result<RotationOutcome> {
        let old_key = key_from_base64(key_b64)?;
        let blob = self.pins.retrieve(content_id).await?;
        let (rotated, new_key) = rotate_key(&blob, &old_key)?;
        // new blob must open under the new key before it is pinned
        let plaintext_hash = sha256_hex(&decrypt(&rotated.to_bytes(), &new_key)?);

        let mut tags = tags.clone();
        tags.insert("encrypted".into(), true.into());
        tags.insert("rotatedFrom".into(), content_id.as_str().into());
        let new_cid = self.pins.store(rotated.to_bytes(), filename, &tags).await?;

        info!(old_cid = %content_id, new_cid = %new_cid, "document key rotated");
        Ok(RotationOutcome {
            content_id: new_cid,
            encryption_key_b64: key_to_base64(&new_key),
            plaintext_hash,
        })
    }

    /// Hash `plaintext` and ask the contract whether it matches the record
    pub async fn verify_on_chain(&self, application_id: &str, plaintext: &[u8]) -> bool {
        match &self.registry {
            Some(registry) => {
                registry
                    .verify_document(application_id, &sha256_hex(plaintext))
                    .await
            }
            None => false,
        }
    }

    pub async fn document_info(&self, application_id: &str) -> Option<ChainRegistration> {
        match &self.registry {
            Some(registry) => registry.document_info(application_id).await,
            None => None,
        }
    }

    pub async fn check_access_code(&self, application_id: &str) -> AccessCodeStatus {
        match &self.registry {
            Some(registry) => registry.check_access_code(application_id).await,
            None => AccessCodeStatus::default(),
        }
    }

    pub async fn document_cid(&self, application_id: &str, access_code: &str) -> Option<ContentId> {
        match &self.registry {
            Some(registry) => registry.document_cid(application_id, access_code).await,
            None => None,
        }
    }

    /// Issue an access code for a department; the write must not be dropped
    pub async fn issue_access_code(&self, application_id: &str) -> Result<IssuedAccessCode> {
        let registry = self.registry.as_ref().ok_or_else(|| {
            CoreError::Chain(ChainError::Transport("chain access is disabled".into()))
        })?;
        Ok(registry.issue_access_code(application_id).await?)
    }

    pub async fn deactivate(&self, application_id: &str) -> Result<Option<String>> {
        match &self.registry {
            Some(registry) => Ok(Some(registry.deactivate_document(application_id).await?)),
            None => Ok(None),
        }
    }
}
