use std::sync::Arc;

use tracing::{info, instrument};

use super::chat::{ChatMessage, ChatModel, ToolSpec};
use super::error::AgentError;
use super::prompt::SYSTEM_PROMPT;
use super::tools::ToolBox;

/// A chat model bound to the system prompt and the tool-set.
pub struct Agent {
    model: Arc<dyn ChatModel>,
    tools: ToolBox,
    specs: Vec<ToolSpec>,
    max_steps: u32,
}

impl Agent {
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolBox, max_steps: u32) -> Self {
        Self {
            specs: tools.specs(),
            model,
            tools,
            max_steps: max_steps.max(1),
        }
    }

    /// Answer one user message, running tool calls until the model replies
    /// with text or the step budget runs out.
    #[instrument(skip_all)]
    pub async fn respond(&self, user_message: &str) -> Result<String, AgentError> {
        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_message),
        ];

        for step in 1..=self.max_steps {
            let reply = self.model.complete(&messages, &self.specs).await?;

            if reply.tool_calls.is_empty() {
                info!(step, "Agent answered");
                return Ok(reply.content.unwrap_or_default());
            }

            let calls = reply.tool_calls.clone();
            messages.push(reply);
            for call in calls {
                let output = self
                    .tools
                    .call(&call.function.name, &call.function.arguments)
                    .await;
                messages.push(ChatMessage::tool_result(&call.id, output));
            }
        }

        Err(AgentError::StepLimit(self.max_steps))
    }
}
