use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common::chain::{
    ChainClient, ChainSettings, ContractArtifact, ContractDeployer, EthersDeployer,
    EthersPurchaseBackend,
};
use common::storage::BlobStore;
use common::storage::filesystem::FilesystemBlobStore;
use common::storage::gateway::{GatewayBlobStore, GatewaySettings};
use common::store::{ContentStore, InMemoryContentStore};
use tracing::{info, warn};

use crate::agent::{AgentProvider, Purchaser, ToolBox};
use crate::ai::{GeminiClient, KeywordExtractor, Summarizer, TextGenerator};
use crate::config::{AppConfig, BlobBackend, StoreBackend, secret};
use crate::error::AppError;
use crate::store::SqlContentStore;

/// A collaborator that may be absent because its credentials are missing.
///
/// Operations that need it fail with `CONFIGURATION_ERROR` instead of the
/// process refusing to start.
#[derive(Clone)]
pub enum Dependency<T> {
    Ready(T),
    Missing(String),
}

impl<T> Dependency<T> {
    pub fn require(&self) -> Result<&T, AppError> {
        match self {
            Dependency::Ready(value) => Ok(value),
            Dependency::Missing(reason) => Err(AppError::Configuration(reason.clone())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Dependency::Ready(_))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub contents: Arc<dyn ContentStore>,
    pub blobs: Dependency<Arc<dyn BlobStore>>,
    pub summarizer: Dependency<Summarizer>,
    pub keywords: Dependency<KeywordExtractor>,
    pub deployer: Dependency<Arc<dyn ContractDeployer>>,
    pub agent: AgentProvider,
}

impl AppState {
    /// Wire every collaborator from configuration.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let contents = content_store(&config).await?;
        let blobs = blob_store(&config).await?;

        let (summarizer, keywords) = match GeminiClient::new(&config.ai) {
            Ok(client) => {
                let generator: Arc<dyn TextGenerator> = Arc::new(client);
                (
                    Dependency::Ready(Summarizer::new(generator.clone())),
                    Dependency::Ready(KeywordExtractor::new(generator)),
                )
            }
            Err(e) => {
                warn!(error = %e, "AI client unavailable");
                let reason = "Gemini API key not configured.".to_string();
                (Dependency::Missing(reason.clone()), Dependency::Missing(reason))
            }
        };

        let chain = match chain_client(&config).await {
            Ok(chain) => Ok(chain),
            Err(e) => {
                warn!(error = %e, "Chain client unavailable");
                Err(e.to_string())
            }
        };

        let deployer = match &chain {
            Ok(chain) => match ContractArtifact::load(&config.chain.artifact_path).await {
                Ok(artifact) => {
                    let deployer: Arc<dyn ContractDeployer> =
                        Arc::new(EthersDeployer::new(chain.clone(), artifact));
                    Dependency::Ready(deployer)
                }
                Err(e) => Dependency::Missing(e.to_string()),
            },
            Err(reason) => Dependency::Missing(reason.clone()),
        };

        let tools = match (&chain, &blobs, &keywords) {
            (Ok(chain), Dependency::Ready(blobs), Dependency::Ready(keywords)) => {
                agent_purchaser(chain, &config.chain.token_address).map(|purchaser| {
                    ToolBox::new(
                        chain.wallet_details(),
                        contents.clone(),
                        blobs.clone(),
                        keywords.clone(),
                        purchaser,
                    )
                })
            }
            (Err(reason), _, _) => Err(reason.clone()),
            (_, Dependency::Missing(reason), _) | (_, _, Dependency::Missing(reason)) => {
                Err(reason.clone())
            }
        };
        let agent = AgentProvider::from_config(&config.agent, tools);

        Ok(Self {
            config: Arc::new(config),
            contents,
            blobs,
            summarizer,
            keywords,
            deployer,
            agent,
        })
    }
}

async fn content_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ContentStore>> {
    let store: Arc<dyn ContentStore> = match config.storage.backend {
        StoreBackend::Memory => {
            info!("Using in-memory content store");
            Arc::new(InMemoryContentStore::new())
        }
        StoreBackend::Sql => {
            let db = crate::database::init_db(
                &config.storage.database_url,
                config.storage.max_connections,
            )
            .await
            .context("Failed to initialize content database")?;
            info!("Using SQL content store");
            Arc::new(SqlContentStore::new(db))
        }
    };

    if config.storage.seed_samples {
        crate::seed::seed_samples(store.as_ref())
            .await
            .context("Failed to seed sample content")?;
    }
    Ok(store)
}

async fn blob_store(config: &AppConfig) -> anyhow::Result<Dependency<Arc<dyn BlobStore>>> {
    let blob = &config.blob;
    Ok(match blob.backend {
        BlobBackend::Filesystem => {
            let mut store = FilesystemBlobStore::new(blob.path.clone(), blob.max_size)
                .await
                .with_context(|| format!("Failed to open blob directory {}", blob.path.display()))?;
            if let Some(url) = &blob.public_url {
                store = store.with_public_url(url.clone());
            }
            let store: Arc<dyn BlobStore> = Arc::new(store);
            Dependency::Ready(store)
        }
        BlobBackend::Gateway => match secret(&blob.api_key) {
            Some(api_key) => {
                let store = GatewayBlobStore::new(GatewaySettings {
                    upload_url: blob.upload_url.clone(),
                    gateway_url: blob.gateway_url.clone(),
                    api_key: api_key.to_string(),
                    max_size: blob.max_size,
                    timeout: Duration::from_secs(blob.timeout_secs),
                })?;
                let store: Arc<dyn BlobStore> = Arc::new(store);
                Dependency::Ready(store)
            }
            None => {
                warn!("Storage gateway API key is not configured");
                Dependency::Missing("Storage API key not configured.".into())
            }
        },
    })
}

fn agent_purchaser(chain: &ChainClient, token_address: &str) -> Result<Purchaser, String> {
    let backend = EthersPurchaseBackend::new(chain.clone(), token_address).map_err(|e| {
        warn!(error = %e, "Payment token address is invalid");
        e.to_string()
    })?;
    Ok(Purchaser {
        backend: Arc::new(backend),
        confirmation_timeout: chain.confirmation_timeout(),
    })
}

async fn chain_client(config: &AppConfig) -> Result<ChainClient, common::chain::ChainError> {
    let chain = &config.chain;
    ChainClient::connect(&ChainSettings {
        rpc_url: secret(&chain.rpc_url).unwrap_or_default().to_string(),
        private_key: secret(&chain.private_key).unwrap_or_default().to_string(),
        chain_id: chain.chain_id,
        confirmation_timeout: Duration::from_secs(chain.confirmation_timeout_secs),
        poll_interval: Duration::from_millis(chain.poll_interval_ms),
    })
    .await
}
