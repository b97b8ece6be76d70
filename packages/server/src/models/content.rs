use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request body for monetizing a piece of content.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UploadRequest {
    /// Raw text to store and summarize.
    #[serde(default)]
    #[schema(example = "# Getting started with FileCoin\n\n...")]
    pub content: String,
    /// Defaults to "Untitled" when absent or blank.
    #[schema(example = "FileCoin Storage Tutorial")]
    pub title: Option<String>,
    /// Uploader's wallet address.
    #[serde(default)]
    #[schema(example = "0xabcdef1234567890")]
    pub wallet_address: String,
    /// Decimal token amount a buyer pays for access.
    #[serde(default)]
    #[schema(example = "1.5")]
    pub amount: String,
}

/// Result of a successful upload.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = "Content monetized and tool created successfully!")]
    pub message: String,
    pub summary: String,
    pub tags: Vec<String>,
    /// Identifier assigned by the blob store.
    pub cid: String,
    pub download: String,
    /// Purchase contract deployed for this upload.
    #[serde(rename = "contractAddress")]
    pub contract_address: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct FetchContentRequest {
    #[serde(default)]
    #[schema(example = "QmFileCoinTutorial987654321")]
    pub hash: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct FetchContentResponse {
    pub content: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct FetchBatchRequest {
    #[serde(default)]
    pub hashes: Vec<String>,
}

/// Content keyed by hash. Items that could not be fetched carry a
/// placeholder message instead of their text.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct FetchBatchResponse {
    pub contents: BTreeMap<String, String>,
}
