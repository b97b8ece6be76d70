use thiserror::Error;

use crate::purchase::TxError;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain is not configured: missing {0}")]
    MissingConfig(&'static str),
    #[error("invalid address {0:?}")]
    InvalidAddress(String),
    #[error("invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },
    #[error("invalid private key: {0}")]
    InvalidKey(String),
    #[error("invalid contract artifact: {0}")]
    Artifact(String),
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("contract deployment failed: {0}")]
    Deploy(String),
    #[error("transaction failed: {0}")]
    Transaction(String),
    #[error("transaction {0} reverted")]
    Reverted(String),
    #[error("transaction {0} was dropped before it was mined")]
    Dropped(String),
    #[error("timed out after {0}s waiting for confirmation")]
    Timeout(u64),
}

impl From<ChainError> for TxError {
    fn from(err: ChainError) -> Self {
        TxError(err.to_string())
    }
}
