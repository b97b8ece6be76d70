use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use common::ContentRecord;
use common::chain::{ChainClient, ChainSettings, DEFAULT_TOKEN_ADDRESS, EthersPurchaseBackend};
use common::purchase::{
    PurchaseBackend, PurchaseController, PurchaseSession, PurchaseState, PurchaseTarget,
};
use console::style;
use dialoguer::Confirm;
use futures::future::join_all;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::api::ApiClient;
use crate::render;

/// Wallet settings for buying access.
#[derive(Debug, Args)]
pub struct WalletArgs {
    /// JSON-RPC endpoint of the EVM network
    #[arg(long, env = "FILWP_RPC_URL")]
    pub rpc_url: String,

    /// Buyer's private key (hex)
    #[arg(long, env = "FILWP_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Chain id; queried from the node when omitted
    #[arg(long, env = "FILWP_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// ERC-20 token used for payment
    #[arg(long, env = "FILWP_TOKEN_ADDRESS", default_value = DEFAULT_TOKEN_ADDRESS)]
    pub token: String,

    /// Seconds to wait for each confirmation
    #[arg(long, default_value_t = 120)]
    pub confirm_timeout: u64,
}

/// Search, buy access to the best match, then read every result.
pub async fn run(api: &ApiClient, query: &str, wallet: &WalletArgs, assume_yes: bool) -> Result<()> {
    let found = api.search(query).await?;
    let Some(best) = found.results.first() else {
        println!("{}", style("No matching content found.").yellow());
        return Ok(());
    };
    println!("{}", render::record(best));

    let target = purchase_target(best)?;
    if !assume_yes {
        let proceed = Confirm::new()
            .with_prompt(format!("Pay {} for access?", target.amount))
            .default(false)
            .interact()?;
        if !proceed {
            return Ok(());
        }
    }

    let timeout = Duration::from_secs(wallet.confirm_timeout);
    let chain = ChainClient::connect(&ChainSettings {
        rpc_url: wallet.rpc_url.clone(),
        private_key: wallet.private_key.clone(),
        chain_id: wallet.chain_id,
        confirmation_timeout: timeout,
        poll_interval: Duration::from_secs(2),
    })
    .await
    .context("Failed to connect wallet")?;
    let backend = EthersPurchaseBackend::new(chain, &wallet.token)?;

    match acquire(backend, target, timeout).await? {
        Access::AlreadyOwned => println!("{}", style("You already have access.").green()),
        Access::Purchased(session) => {
            tracing::debug!(tx = ?session.purchase_tx, "Access purchased");
        }
    }

    let hashes: Vec<String> = found.results.iter().map(|r| r.content_hash.clone()).collect();
    for (hash, content) in fetch_all(api, &hashes).await {
        println!("\n{}", style(&hash).bold());
        println!("{content}");
    }
    Ok(())
}

fn purchase_target(record: &ContentRecord) -> Result<PurchaseTarget> {
    match PurchaseTarget::from_record(record) {
        Some(target) => Ok(target),
        None => bail!("'{}' has no purchase contract", record.title),
    }
}

#[derive(Debug)]
enum Access {
    AlreadyOwned,
    Purchased(PurchaseSession),
}

/// Pay for `target` unless the wallet already owns it.
async fn acquire<B: PurchaseBackend>(backend: B, target: PurchaseTarget, timeout: Duration) -> Result<Access> {
    let mut controller = PurchaseController::new(backend, timeout);
    if controller.has_access(&target).await? {
        return Ok(Access::AlreadyOwned);
    }

    let progress = tokio::spawn(report_progress(controller.subscribe()));
    let outcome = controller.purchase(target).await;
    drop(controller);
    let _ = progress.await;

    let session = outcome?;
    if session.state != PurchaseState::Purchased {
        bail!("Purchase ended in state {:?}", session.state);
    }
    Ok(Access::Purchased(session))
}

/// Print each state the session passes through until the controller is
/// dropped. Returns the states printed.
async fn report_progress(mut updates: broadcast::Receiver<PurchaseSession>) -> Vec<PurchaseState> {
    let mut seen = Vec::new();
    loop {
        match updates.recv().await {
            Ok(session) => {
                println!("{}", render::progress(&session));
                seen.push(session.state);
            }
            Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "Progress updates dropped"),
            Err(RecvError::Closed) => return seen,
        }
    }
}

/// Fetch every hash concurrently. A failure shows up in place of that
/// item's text.
async fn fetch_all(api: &ApiClient, hashes: &[String]) -> Vec<(String, String)> {
    join_all(hashes.iter().map(|hash| async move {
        let text = match api.fetch(hash).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%hash, error = %e, "Error fetching content");
                "Failed to fetch content.".to_string()
            }
        };
        (hash.clone(), text)
    }))
    .await
}
