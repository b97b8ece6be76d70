use async_trait::async_trait;
use ethers::contract::ContractFactory;
use ethers::types::U64;
use ethers::utils::to_checksum;
use tracing::{info, instrument};

use super::amount::parse_amount;
use super::artifact::ContractArtifact;
use super::client::ChainClient;
use super::error::ChainError;

/// Deploys one payment contract per uploaded record.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Deploy with constructor `(string contentId, uint256 price)` and
    /// return the checksummed contract address.
    async fn deploy(&self, content_id: &str, amount: &str) -> Result<String, ChainError>;
}

pub struct EthersDeployer {
    chain: ChainClient,
    artifact: ContractArtifact,
}

impl EthersDeployer {
    pub fn new(chain: ChainClient, artifact: ContractArtifact) -> Self {
        Self { chain, artifact }
    }
}

#[async_trait]
impl ContractDeployer for EthersDeployer {
    #[instrument(skip(self))]
    async fn deploy(&self, content_id: &str, amount: &str) -> Result<String, ChainError> {
        let price = parse_amount(amount)?;
        let factory = ContractFactory::new(
            self.artifact.abi.clone(),
            self.artifact.bytecode.clone(),
            self.chain.client(),
        );
        let deployer = factory
            .deploy((content_id.to_string(), price))
            .map_err(|e| ChainError::Deploy(e.to_string()))?;

        let timeout = self.chain.confirmation_timeout();
        let (contract, receipt) = tokio::time::timeout(timeout, deployer.send_with_receipt())
            .await
            .map_err(|_| ChainError::Timeout(timeout.as_secs()))?
            .map_err(|e| ChainError::Deploy(e.to_string()))?;

        if receipt.status != Some(U64::from(1)) {
            return Err(ChainError::Reverted(format!("{:?}", receipt.transaction_hash)));
        }

        let address = to_checksum(&contract.address(), None);
        info!(%address, tx = ?receipt.transaction_hash, "Contract deployed");
        Ok(address)
    }
}
