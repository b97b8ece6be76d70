use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI API key is not configured")]
    MissingKey,
    #[error("AI request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("AI API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI reply had no text candidate")]
    EmptyReply,
    #[error("AI did not return a JSON {0}")]
    NoJson(&'static str),
    #[error("AI returned invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
