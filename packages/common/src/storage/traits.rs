use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Identifier and locator of a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    /// Backend-assigned identifier (hex SHA-256 or IPFS CID).
    pub hash: String,
    /// Where the raw bytes can be retrieved from.
    pub download: String,
}

/// Content-addressed storage for uploaded raw content.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes and return their identifier and locator.
    async fn put(&self, data: &[u8]) -> Result<StoredBlob, StorageError>;

    /// Retrieve all bytes for a blob by its identifier.
    async fn get(&self, hash: &str) -> Result<Vec<u8>, StorageError>;

    /// Retrieve a blob as text, replacing invalid UTF-8 sequences.
    async fn get_text(&self, hash: &str) -> Result<String, StorageError> {
        let bytes = self.get(hash).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
