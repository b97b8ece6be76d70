use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, multipart};
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::StorageError;
use super::traits::{BlobStore, StoredBlob};

/// Connection settings for an IPFS pinning gateway.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Upload endpoint, e.g. `https://node.lighthouse.storage/api/v0/add`.
    pub upload_url: String,
    /// Retrieval prefix, e.g. `https://gateway.lighthouse.storage/ipfs`.
    pub gateway_url: String,
    pub api_key: String,
    pub max_size: u64,
    pub timeout: Duration,
}

#[derive(Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Blob store that pins content on a remote IPFS gateway.
pub struct GatewayBlobStore {
    client: Client,
    settings: GatewaySettings,
}

impl GatewayBlobStore {
    pub fn new(settings: GatewaySettings) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| StorageError::Gateway(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    fn object_url(&self, cid: &str) -> String {
        format!("{}/{}", self.settings.gateway_url.trim_end_matches('/'), cid)
    }
}

/// CIDs are base-encoded; anything else would let callers steer the gateway URL.
fn validate_cid(cid: &str) -> Result<&str, StorageError> {
    let cid = cid.trim();
    if cid.is_empty() || !cid.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StorageError::InvalidHash(format!("not a CID: {cid:?}")));
    }
    Ok(cid)
}

#[async_trait]
impl BlobStore for GatewayBlobStore {
    async fn put(&self, data: &[u8]) -> Result<StoredBlob, StorageError> {
        if data.len() as u64 > self.settings.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.settings.max_size,
            });
        }

        let part = multipart::Part::bytes(data.to_vec())
            .file_name("content.md")
            .mime_str("text/markdown")
            .map_err(|e| StorageError::Gateway(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(&self.settings.upload_url)
            .bearer_auth(&self.settings.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::Gateway(format!("upload request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Gateway rejected upload");
            return Err(StorageError::Gateway(format!(
                "upload failed with status {status}"
            )));
        }

        let added: AddResponse = res
            .json()
            .await
            .map_err(|e| StorageError::Gateway(format!("unexpected upload reply: {e}")))?;
        debug!(cid = %added.hash, size = data.len(), "Pinned content");

        Ok(StoredBlob {
            download: self.object_url(&added.hash),
            hash: added.hash,
        })
    }

    async fn get(&self, hash: &str) -> Result<Vec<u8>, StorageError> {
        let cid = validate_cid(hash)?;
        let res = self
            .client
            .get(self.object_url(cid))
            .bearer_auth(&self.settings.api_key)
            .send()
            .await
            .map_err(|e| StorageError::Gateway(format!("fetch request failed: {e}")))?;

        match res.status() {
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(cid.to_string())),
            s if s.is_success() => res
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| StorageError::Gateway(format!("failed to read body: {e}"))),
            s => Err(StorageError::Gateway(format!("fetch failed with status {s}"))),
        }
    }
}
