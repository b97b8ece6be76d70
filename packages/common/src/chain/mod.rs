//! EVM access: contract deployment and the wallet side of purchases.

mod amount;
mod artifact;
mod backend;
mod bindings;
mod client;
mod deployer;
mod error;

pub use amount::parse_amount;
pub use artifact::ContractArtifact;
pub use backend::{DEFAULT_TOKEN_ADDRESS, EthersPurchaseBackend};
pub use bindings::{ContentAccess, Erc20Token};
pub use client::{ChainClient, ChainSettings, SignerClient, WalletDetails, parse_address};
pub use deployer::{ContractDeployer, EthersDeployer};
pub use error::ChainError;
