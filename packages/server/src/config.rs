use std::path::PathBuf;
use std::time::Duration;

use common::chain::DEFAULT_TOKEN_ADDRESS;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec![],
            max_age: 3600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Which [`ContentStore`](common::store::ContentStore) backs metadata.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sql,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    pub database_url: String,
    pub max_connections: u32,
    /// Insert the sample records at startup.
    pub seed_samples: bool,
}

/// Which [`BlobStore`](common::storage::BlobStore) keeps raw content.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    Filesystem,
    Gateway,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlobConfig {
    pub backend: BlobBackend,
    pub path: PathBuf,
    pub max_size: u64,
    /// Prefix for filesystem download links.
    pub public_url: Option<String>,
    pub upload_url: String,
    pub gateway_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub chain_id: Option<u64>,
    pub token_address: String,
    /// Compiled purchase contract (JSON with `abi` and `bytecode`).
    pub artifact_path: PathBuf,
    pub confirmation_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_steps: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub blob: BlobConfig,
    pub ai: AiConfig,
    pub chain: ChainConfig,
    pub agent: AgentConfig,
}

/// Treat blank secrets the same as missing ones.
pub fn secret(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("FILWP_CONFIG").unwrap_or_else(|_| "config/config".into());

        Self::builder(&path)?
            // Override from environment (e.g., FILWP__AI__API_KEY)
            .add_source(Environment::with_prefix("FILWP").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with the optional file at `path`.
    fn builder(path: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.database_url", "sqlite://filwp.db?mode=rwc")?
            .set_default("storage.max_connections", 10)?
            .set_default("storage.seed_samples", false)?
            .set_default("blob.backend", "filesystem")?
            .set_default("blob.path", "./data/blobs")?
            .set_default("blob.max_size", 10 * 1024 * 1024)?
            .set_default("blob.upload_url", "https://node.lighthouse.storage/api/v0/add")?
            .set_default("blob.gateway_url", "https://gateway.lighthouse.storage/ipfs")?
            .set_default("blob.timeout_secs", 60)?
            .set_default("ai.base_url", "https://generativelanguage.googleapis.com/v1beta")?
            .set_default("ai.model", "gemini-1.5-flash")?
            .set_default("ai.timeout_secs", 30)?
            .set_default("chain.token_address", DEFAULT_TOKEN_ADDRESS)?
            .set_default("chain.artifact_path", "contracts/ContentAccess.json")?
            .set_default("chain.confirmation_timeout_secs", 120)?
            .set_default("chain.poll_interval_ms", 2000)?
            .set_default("agent.enabled", false)?
            .set_default("agent.base_url", "https://api.openai.com/v1")?
            .set_default("agent.model", "gpt-4o-mini")?
            .set_default("agent.max_steps", 10)?
            .set_default("agent.timeout_secs", 60)?
            // Load from config/config.toml unless FILWP_CONFIG points elsewhere
            .add_source(File::with_name(path).required(false)))
    }
}
