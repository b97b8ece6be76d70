use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title assigned to uploads that arrive without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// One monetized piece of content and its metadata.
///
/// Records are append-only: once stored, no field changes. In particular
/// `content_hash` is assigned by the blob store at upload time and
/// `contract_address` is either empty (not purchasable) or the address of the
/// contract deployed for this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContentRecord {
    /// One-sentence AI summary.
    #[schema(example = "Learn how to use FileCoin for decentralized storage")]
    pub summary: String,
    /// Ordered topic tags.
    #[schema(example = json!(["filecoin", "storage"]))]
    pub tags: Vec<String>,
    /// Identifier assigned by the blob store.
    #[serde(rename = "hash")]
    #[schema(example = "QmFileCoinTutorial987654321")]
    pub content_hash: String,
    /// Locator for the raw content.
    pub download: String,
    #[schema(example = "FileCoin Storage Tutorial")]
    pub title: String,
    /// Uploader's chain address.
    #[schema(example = "0xabcdef1234567890")]
    pub wallet_address: String,
    /// Decimal token amount required to purchase access.
    #[schema(example = "1.5")]
    pub amount: String,
    /// Purchase contract for this record, empty when none was deployed.
    #[serde(rename = "contractAddress")]
    pub contract_address: String,
    pub timestamp: DateTime<Utc>,
}

impl ContentRecord {
    /// Whether a buyer can run the approve/purchase flow against this record.
    pub fn is_purchasable(&self) -> bool {
        !self.contract_address.trim().is_empty() && !self.amount.trim().is_empty()
    }

    /// Tags encoded the way they are persisted.
    pub fn tags_json(&self) -> String {
        encode_tags(&self.tags)
    }
}

/// Normalize a user-supplied title, falling back to [`DEFAULT_TITLE`].
pub fn title_or_default(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_TITLE.to_string(),
    }
}

/// Serialize tags to the JSON text stored in the `tags` column.
pub fn encode_tags(tags: &[String]) -> String {
    // Serializing a slice of strings cannot fail.
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Parse the JSON text stored in the `tags` column.
pub fn decode_tags(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(raw)
}
