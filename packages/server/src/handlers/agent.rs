use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::agent::AgentError;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::agent::*;
use crate::state::AppState;

impl From<AgentError> for AppError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Disabled | AgentError::MissingKey | AgentError::Wallet(_) => {
                AppError::Configuration(err.to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[utoipa::path(
    post,
    path = "/agent",
    tag = "Agent",
    operation_id = "messageAgent",
    summary = "Chat with the content discovery agent",
    request_body = AgentRequest,
    responses(
        (status = 200, description = "Agent reply", body = AgentResponse),
        (status = 400, description = "Empty message (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Agent unavailable (CONFIGURATION_ERROR, INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn message_agent(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AgentRequest>,
) -> Result<Json<AgentResponse>, AppError> {
    let message = payload.user_message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("userMessage is required.".into()));
    }

    let agent = state.agent.get().await?;
    let response = agent.respond(message).await?;
    Ok(Json(AgentResponse { response }))
}
