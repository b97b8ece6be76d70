use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("The agent is not enabled.")]
    Disabled,
    #[error("I need an agent API key in the configuration to power my intelligence.")]
    MissingKey,
    #[error("agent wallet is unavailable: {0}")]
    Wallet(String),
    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("chat API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("chat API returned no choices")]
    EmptyReply,
    #[error("agent gave no answer within {0} steps")]
    StepLimit(u32),
}
