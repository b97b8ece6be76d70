use axum::Json;
use axum::extract::State;

use crate::error::{AppError, ErrorBody};
use crate::models::health::HealthResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Liveness and configured collaborators",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
        (status = 500, description = "Content store unreachable (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    Ok(Json(HealthResponse {
        status: "ok",
        contents: state.contents.count().await?,
        ai: state.summarizer.is_ready(),
        blobs: state.blobs.is_ready(),
        chain: state.deployer.is_ready(),
    }))
}
