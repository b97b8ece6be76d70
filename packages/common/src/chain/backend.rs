use async_trait::async_trait;
use ethers::providers::{Middleware, PendingTransaction};
use ethers::types::{Address, TxHash, U64};
use tracing::debug;

use super::amount::parse_amount;
use super::bindings::{ContentAccess, Erc20Token};
use super::client::{ChainClient, parse_address};
use super::error::ChainError;
use crate::purchase::{PurchaseBackend, TxError};

/// Payment token used when none is configured (USDFC on Filecoin Calibration).
pub const DEFAULT_TOKEN_ADDRESS: &str = "0xb3042734b608a1B16e9e86B374A3f3e389B4cDf0";

/// Buys access using the process wallet.
pub struct EthersPurchaseBackend {
    chain: ChainClient,
    token: Address,
}

impl EthersPurchaseBackend {
    pub fn new(chain: ChainClient, token_address: &str) -> Result<Self, ChainError> {
        Ok(Self {
            token: parse_address(token_address)?,
            chain,
        })
    }
}

#[async_trait]
impl PurchaseBackend for EthersPurchaseBackend {
    async fn has_access(&self, contract: &str) -> Result<bool, TxError> {
        let access = ContentAccess::new(parse_address(contract)?, self.chain.client());
        let owned = access
            .has_access(self.chain.address())
            .call()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        Ok(owned)
    }

    async fn approve(&self, spender: &str, amount: &str) -> Result<String, TxError> {
        let spender = parse_address(spender)?;
        let value = parse_amount(amount)?;
        let token = Erc20Token::new(self.token, self.chain.client());

        let call = token.approve(spender, value);
        let pending = call
            .send()
            .await
            .map_err(|e| ChainError::Transaction(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        debug!(tx = ?tx_hash, "approve sent");
        Ok(format!("{tx_hash:?}"))
    }

    async fn purchase_access(&self, contract: &str) -> Result<String, TxError> {
        let access = ContentAccess::new(parse_address(contract)?, self.chain.client());

        let call = access.purchase_access();
        let pending = call
            .send()
            .await
            .map_err(|e| ChainError::Transaction(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        debug!(tx = ?tx_hash, "purchaseAccess sent");
        Ok(format!("{tx_hash:?}"))
    }

    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<(), TxError> {
        let hash: TxHash = tx_hash
            .parse()
            .map_err(|_| ChainError::Transaction(format!("malformed transaction hash {tx_hash}")))?;

        let client = self.chain.client();
        let receipt = PendingTransaction::new(hash, client.provider())
            .interval(self.chain.poll_interval())
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .ok_or_else(|| ChainError::Dropped(tx_hash.to_string()))?;

        if receipt.status != Some(U64::from(1)) {
            return Err(ChainError::Reverted(tx_hash.to_string()).into());
        }
        Ok(())
    }
}
