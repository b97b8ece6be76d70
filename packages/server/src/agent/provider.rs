use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use super::chat::OpenAiChat;
use super::error::AgentError;
use super::runner::Agent;
use super::tools::ToolBox;
use crate::config::{AgentConfig, secret};

type Init = dyn Fn() -> Result<Agent, AgentError> + Send + Sync;

/// Builds the agent on first use and hands out the same instance afterwards.
///
/// A failed build is not cached, so a later call retries it.
#[derive(Clone)]
pub struct AgentProvider {
    cell: Arc<OnceCell<Arc<Agent>>>,
    init: Arc<Init>,
}

impl AgentProvider {
    pub fn new(init: impl Fn() -> Result<Agent, AgentError> + Send + Sync + 'static) -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
            init: Arc::new(init),
        }
    }

    /// A provider that always reports the agent as disabled.
    pub fn disabled() -> Self {
        Self::new(|| Err(AgentError::Disabled))
    }

    /// Production wiring. `tools` carries the reason when the signing wallet
    /// could not be set up.
    pub fn from_config(config: &AgentConfig, tools: Result<ToolBox, String>) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let config = config.clone();
        Self::new(move || {
            let api_key = secret(&config.api_key).ok_or(AgentError::MissingKey)?;
            let tools = tools.clone().map_err(AgentError::Wallet)?;
            let model = OpenAiChat::new(
                &config.base_url,
                api_key,
                &config.model,
                std::time::Duration::from_secs(config.timeout_secs),
            )?;
            info!(model = %config.model, max_steps = config.max_steps, "Agent initialized");
            Ok(Agent::new(Arc::new(model), tools, config.max_steps))
        })
    }

    pub async fn get(&self) -> Result<Arc<Agent>, AgentError> {
        self.cell
            .get_or_try_init(|| async { (self.init)().map(Arc::new) })
            .await
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
