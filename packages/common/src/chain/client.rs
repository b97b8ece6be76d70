use std::sync::Arc;
use std::time::Duration;

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use ethers::utils::to_checksum;
use serde::Serialize;
use tracing::info;

use super::error::ChainError;

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Connection settings for the EVM network.
#[derive(Debug, Clone)]
pub struct ChainSettings {
    pub rpc_url: String,
    pub private_key: String,
    /// Queried from the node when unset.
    pub chain_id: Option<u64>,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
}

/// Public details of the signing wallet.
#[derive(Debug, Clone, Serialize)]
pub struct WalletDetails {
    pub address: String,
    pub chain_id: u64,
}

/// Signing client shared by the deployer and purchase backend.
#[derive(Clone)]
pub struct ChainClient {
    client: Arc<SignerClient>,
    chain_id: u64,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl ChainClient {
    pub async fn connect(settings: &ChainSettings) -> Result<Self, ChainError> {
        if settings.rpc_url.trim().is_empty() {
            return Err(ChainError::MissingConfig("rpc url"));
        }
        if settings.private_key.trim().is_empty() {
            return Err(ChainError::MissingConfig("private key"));
        }

        let provider = Provider::<Http>::try_from(settings.rpc_url.as_str())
            .map_err(|e| ChainError::Rpc(format!("bad rpc url: {e}")))?
            .interval(settings.poll_interval);

        let wallet: LocalWallet = settings
            .private_key
            .trim()
            .parse()
            .map_err(|e: ethers::signers::WalletError| ChainError::InvalidKey(e.to_string()))?;

        let chain_id = match settings.chain_id {
            Some(id) => id,
            None => provider
                .get_chainid()
                .await
                .map_err(|e| ChainError::Rpc(format!("failed to get chain id: {e}")))?
                .as_u64(),
        };

        let wallet = wallet.with_chain_id(chain_id);
        info!(address = %to_checksum(&wallet.address(), None), chain_id, "Chain client ready");

        Ok(Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            chain_id,
            confirmation_timeout: settings.confirmation_timeout,
            poll_interval: settings.poll_interval,
        })
    }

    pub fn client(&self) -> Arc<SignerClient> {
        self.client.clone()
    }

    pub fn address(&self) -> Address {
        self.client.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn confirmation_timeout(&self) -> Duration {
        self.confirmation_timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn wallet_details(&self) -> WalletDetails {
        WalletDetails {
            address: to_checksum(&self.address(), None),
            chain_id: self.chain_id,
        }
    }
}

pub fn parse_address(raw: &str) -> Result<Address, ChainError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| ChainError::InvalidAddress(raw.to_string()))
}
