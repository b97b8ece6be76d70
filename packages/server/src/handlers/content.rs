use std::collections::{BTreeMap, BTreeSet};

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use common::ContentRecord;
use common::chain::parse_amount;
use common::content::title_or_default;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::content::*;
use crate::state::AppState;

pub const UPLOAD_MESSAGE: &str = "Content monetized and tool created successfully!";
pub const FETCH_FAILED: &str = "Failed to fetch content.";

fn validate_upload(payload: &UploadRequest) -> Result<(), AppError> {
    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required.".into()));
    }
    if payload.wallet_address.trim().is_empty() {
        return Err(AppError::Validation("Wallet address is required.".into()));
    }
    if payload.amount.trim().is_empty() {
        return Err(AppError::Validation("Amount is required.".into()));
    }
    parse_amount(&payload.amount)?;
    Ok(())
}

#[utoipa::path(
    post,
    path = "/contents",
    tag = "Contents",
    operation_id = "uploadContent",
    summary = "Monetize a piece of content",
    description = "Stores the raw text, summarizes and tags it, deploys a purchase contract priced at `amount`, then records the metadata. If deployment fails nothing is recorded.",
    request_body = UploadRequest,
    responses(
        (status = 201, description = "Content stored and contract deployed", body = UploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Identical content already monetized (CONFLICT)", body = ErrorBody),
        (status = 500, description = "Missing credentials or storage failure (CONFIGURATION_ERROR, STORAGE_ERROR)", body = ErrorBody),
        (status = 502, description = "Contract deployment failed (CHAIN_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(len = payload.content.len()))]
pub async fn upload_content(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UploadRequest>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    validate_upload(&payload)?;

    let blobs = state.blobs.require()?;
    let summarizer = state.summarizer.require()?;
    let deployer = state.deployer.require()?;

    let blob = blobs.put(payload.content.as_bytes()).await?;
    info!(hash = %blob.hash, "Stored content");

    // Identical text hashes the same; never deploy a second contract for it.
    if state.contents.find_by_hash(&blob.hash).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Content '{}' has already been monetized",
            blob.hash
        )));
    }

    let summary = summarizer.summarize(&payload.content).await;
    let contract_address = deployer.deploy(&blob.hash, payload.amount.trim()).await?;

    let record = ContentRecord {
        summary: summary.summary.clone(),
        tags: summary.tags.clone(),
        content_hash: blob.hash.clone(),
        download: blob.download.clone(),
        title: title_or_default(payload.title.as_deref()),
        wallet_address: payload.wallet_address.trim().to_string(),
        amount: payload.amount.trim().to_string(),
        contract_address: contract_address.clone(),
        timestamp: Utc::now(),
    };
    state.contents.insert(record).await?;
    info!(hash = %blob.hash, contract = %contract_address, "Content monetized");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: UPLOAD_MESSAGE.into(),
            summary: summary.summary,
            tags: summary.tags,
            cid: blob.hash,
            download: blob.download,
            contract_address,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/contents/fetch",
    tag = "Contents",
    operation_id = "fetchContent",
    summary = "Fetch raw content by hash",
    request_body = FetchContentRequest,
    responses(
        (status = 200, description = "Raw content", body = FetchContentResponse),
        (status = 400, description = "Missing or malformed hash (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Unknown hash (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage failure (CONFIGURATION_ERROR, STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(hash = %payload.hash))]
pub async fn fetch_content(
    State(state): State<AppState>,
    AppJson(payload): AppJson<FetchContentRequest>,
) -> Result<Json<FetchContentResponse>, AppError> {
    let hash = payload.hash.trim();
    if hash.is_empty() {
        return Err(AppError::Validation("Hash is required".into()));
    }

    let content = state.blobs.require()?.get_text(hash).await?;
    Ok(Json(FetchContentResponse { content }))
}

#[utoipa::path(
    post,
    path = "/contents/fetch-batch",
    tag = "Contents",
    operation_id = "fetchContentBatch",
    summary = "Fetch several contents concurrently",
    description = "Fetches every hash at once. A failed item is reported as \"Failed to fetch content.\" and does not affect the others.",
    request_body = FetchBatchRequest,
    responses(
        (status = 200, description = "Contents keyed by hash", body = FetchBatchResponse),
        (status = 500, description = "Blob storage not configured (CONFIGURATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(count = payload.hashes.len()))]
pub async fn fetch_content_batch(
    State(state): State<AppState>,
    AppJson(payload): AppJson<FetchBatchRequest>,
) -> Result<Json<FetchBatchResponse>, AppError> {
    let blobs = state.blobs.require()?;
    let hashes: BTreeSet<&str> = payload
        .hashes
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect();

    let fetched = join_all(hashes.into_iter().map(|hash| async move {
        let text = match blobs.get_text(hash).await {
            Ok(text) => text,
            Err(e) if e.is_client_error() => {
                debug!(%hash, error = %e, "Skipping unavailable content");
                FETCH_FAILED.to_string()
            }
            Err(e) => {
                warn!(%hash, error = %e, "Error fetching content");
                FETCH_FAILED.to_string()
            }
        };
        (hash.to_string(), text)
    }))
    .await;

    Ok(Json(FetchBatchResponse {
        contents: fetched.into_iter().collect::<BTreeMap<_, _>>(),
    }))
}
