use std::sync::Arc;
use std::time::Duration;

use common::chain::WalletDetails;
use common::purchase::{PurchaseBackend, PurchaseController, PurchaseTarget};
use common::storage::BlobStore;
use common::store::ContentStore;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::chat::{FunctionSpec, ToolSpec};
use crate::ai::KeywordExtractor;
use crate::search::best_match;

pub const GET_WALLET_DETAILS: &str = "get_wallet_details";
pub const SEARCH_CONTENT: &str = "search_content";
pub const FETCH_CONTENT: &str = "fetch_content";
pub const PURCHASE_CONTENT: &str = "purchase_content";

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Deserialize)]
struct HashArgs {
    hash: String,
}

/// How the agent's own wallet pays for content.
#[derive(Clone)]
pub struct Purchaser {
    pub backend: Arc<dyn PurchaseBackend>,
    pub confirmation_timeout: Duration,
}

/// The operations the agent may invoke.
#[derive(Clone)]
pub struct ToolBox {
    wallet: WalletDetails,
    contents: Arc<dyn ContentStore>,
    blobs: Arc<dyn BlobStore>,
    keywords: KeywordExtractor,
    purchaser: Purchaser,
}

impl ToolBox {
    pub fn new(
        wallet: WalletDetails,
        contents: Arc<dyn ContentStore>,
        blobs: Arc<dyn BlobStore>,
        keywords: KeywordExtractor,
        purchaser: Purchaser,
    ) -> Self {
        Self {
            wallet,
            contents,
            blobs,
            keywords,
            purchaser,
        }
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec {
                kind: "function",
                function: FunctionSpec {
                    name: GET_WALLET_DETAILS,
                    description: "Get the agent wallet address and the chain id of the network it is on.",
                    parameters: json!({"type": "object", "properties": {}}),
                },
            },
            ToolSpec {
                kind: "function",
                function: FunctionSpec {
                    name: SEARCH_CONTENT,
                    description: "Search the content registry for the best match to a topic. Returns title, summary, tags, hash, download link, contract address and amount.",
                    parameters: json!({
                        "type": "object",
                        "properties": {"query": {"type": "string", "description": "What the user is looking for"}},
                        "required": ["query"]
                    }),
                },
            },
            ToolSpec {
                kind: "function",
                function: FunctionSpec {
                    name: FETCH_CONTENT,
                    description: "Fetch the raw text of a content item by its hash.",
                    parameters: json!({
                        "type": "object",
                        "properties": {"hash": {"type": "string"}},
                        "required": ["hash"]
                    }),
                },
            },
            ToolSpec {
                kind: "function",
                function: FunctionSpec {
                    name: PURCHASE_CONTENT,
                    description: "Buy access to a content item with the agent wallet: approve the payment token, then call purchaseAccess on the item's contract. Returns the final purchase session, or alreadyOwned when the wallet has access.",
                    parameters: json!({
                        "type": "object",
                        "properties": {"hash": {"type": "string"}},
                        "required": ["hash"]
                    }),
                },
            },
        ]
    }

    /// Run a tool and return its JSON output. Failures are reported to the
    /// model as `{"error": ...}` instead of aborting the conversation.
    pub async fn call(&self, name: &str, arguments: &str) -> String {
        debug!(tool = name, "Calling agent tool");
        let output = match name {
            GET_WALLET_DETAILS => Ok(json!(self.wallet)),
            SEARCH_CONTENT => self.search(arguments).await,
            FETCH_CONTENT => self.fetch(arguments).await,
            PURCHASE_CONTENT => self.purchase(arguments).await,
            other => Err(format!("unknown tool {other}")),
        };
        match output {
            Ok(value) => value.to_string(),
            Err(e) => {
                warn!(tool = name, error = %e, "Agent tool failed");
                json!({ "error": e }).to_string()
            }
        }
    }

    async fn search(&self, arguments: &str) -> Result<Value, String> {
        let args: SearchArgs = parse_args(arguments)?;
        let results = best_match(&self.keywords, self.contents.as_ref(), &args.query)
            .await
            .map_err(|e| format!("internal error: {e}"))?;
        Ok(json!({ "total": results.len(), "results": results }))
    }

    async fn fetch(&self, arguments: &str) -> Result<Value, String> {
        let args: HashArgs = parse_args(arguments)?;
        let content = self
            .blobs
            .get_text(args.hash.trim())
            .await
            .map_err(|e| e.to_string())?;
        Ok(json!({ "content": content }))
    }

    async fn purchase(&self, arguments: &str) -> Result<Value, String> {
        let args: HashArgs = parse_args(arguments)?;
        let hash = args.hash.trim();
        let record = self
            .contents
            .find_by_hash(hash)
            .await
            .map_err(|e| format!("internal error: {e}"))?
            .ok_or_else(|| format!("no content with hash {hash}"))?;
        let target = PurchaseTarget::from_record(&record)
            .ok_or_else(|| format!("'{}' has no purchase contract", record.title))?;

        let mut controller = PurchaseController::new(
            self.purchaser.backend.clone(),
            self.purchaser.confirmation_timeout,
        );
        if controller.has_access(&target).await.map_err(|e| e.to_string())? {
            return Ok(json!({ "hash": hash, "alreadyOwned": true }));
        }

        match controller.purchase(target).await {
            Ok(session) => Ok(json!({ "session": session })),
            Err(e) => {
                warn!(%hash, error = %e, "Agent purchase failed");
                Ok(json!({ "error": e.to_string(), "session": controller.session() }))
            }
        }
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: &str) -> Result<T, String> {
    let raw = if arguments.trim().is_empty() { "{}" } else { arguments };
    serde_json::from_str(raw).map_err(|e| format!("invalid arguments: {e}"))
}
