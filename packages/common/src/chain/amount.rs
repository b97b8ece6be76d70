use ethers::types::U256;
use ethers::utils::parse_ether;

use super::error::ChainError;

/// Convert a decimal token amount into base units (18 decimals).
///
/// Deployment and approval both go through here so the contract price and
/// the allowance always agree.
pub fn parse_amount(amount: &str) -> Result<U256, ChainError> {
    let trimmed = amount.trim();
    let invalid = |reason: &str| ChainError::InvalidAmount {
        amount: amount.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("negative"));
    }
    parse_ether(trimmed).map_err(|e| invalid(&e.to_string()))
}
