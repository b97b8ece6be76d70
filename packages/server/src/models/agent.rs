use serde::{Deserialize, Serialize};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AgentRequest {
    #[serde(rename = "userMessage", default)]
    #[schema(example = "Do you have anything about FileCoin storage?")]
    pub user_message: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AgentResponse {
    pub response: String,
}
