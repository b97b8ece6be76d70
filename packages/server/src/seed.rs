use chrono::Utc;
use common::ContentRecord;
use common::store::{ContentStore, StoreError};
use tracing::info;

const GATEWAY: &str = "https://gateway.lighthouse.storage/ipfs";

/// (title, summary, tags, hash, wallet)
const SAMPLES: &[(&str, &str, &[&str], &str, &str)] = &[
    (
        "Web3 Development Guide",
        "A comprehensive guide to building decentralized applications with modern web3 technologies",
        &["web3", "development", "blockchain", "dapps"],
        "QmSampleWeb3Guide123456789",
        "0x1234567890abcdef",
    ),
    (
        "FileCoin Storage Tutorial",
        "Learn how to use FileCoin for decentralized storage and content monetization",
        &["filecoin", "storage", "monetization", "ipfs"],
        "QmFileCoinTutorial987654321",
        "0xabcdef1234567890",
    ),
    (
        "DeFi Yield Farming Strategies",
        "Advanced strategies for yield farming and liquidity provision in DeFi protocols",
        &["defi", "yield-farming", "liquidity", "cryptocurrency"],
        "QmDeFiStrategies456789123",
        "0x7890abcdef123456",
    ),
];

/// The built-in demo records. They have no contract, so they can be found
/// but not bought.
pub fn sample_records() -> Vec<ContentRecord> {
    let now = Utc::now();
    SAMPLES
        .iter()
        .map(|(title, summary, tags, hash, wallet)| ContentRecord {
            summary: summary.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            content_hash: hash.to_string(),
            download: format!("{GATEWAY}/{hash}"),
            title: title.to_string(),
            wallet_address: wallet.to_string(),
            amount: String::new(),
            contract_address: String::new(),
            timestamp: now,
        })
        .collect()
}

/// Insert the sample records, skipping any that are already present.
pub async fn seed_samples(store: &dyn ContentStore) -> Result<(), StoreError> {
    let mut inserted = 0u32;
    for record in sample_records() {
        match store.insert(record).await {
            Ok(()) => inserted += 1,
            Err(StoreError::Duplicate(_)) => {}
            Err(e) => return Err(e),
        }
    }
    info!(inserted, "Seeded sample content");
    Ok(())
}
