//! Conversational content discovery agent.

mod chat;
mod error;
mod prompt;
mod provider;
mod runner;
mod tools;

pub use chat::{ChatMessage, ChatModel, FunctionCall, OpenAiChat, Role, ToolCall, ToolSpec};
pub use error::AgentError;
pub use prompt::SYSTEM_PROMPT;
pub use provider::AgentProvider;
pub use runner::Agent;
pub use tools::{FETCH_CONTENT, GET_WALLET_DETAILS, PURCHASE_CONTENT, Purchaser, SEARCH_CONTENT, ToolBox};
