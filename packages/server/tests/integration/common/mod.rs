use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use common::chain::{ChainError, ContractDeployer};
use common::purchase::{PurchaseBackend, TxError};
use common::storage::BlobStore;
use common::storage::filesystem::FilesystemBlobStore;
use common::store::{ContentStore, InMemoryContentStore};
use filwp_server::agent::{
    Agent, AgentError, AgentProvider, ChatMessage, ChatModel, FunctionCall, PURCHASE_CONTENT,
    Purchaser, Role, ToolBox, ToolCall, ToolSpec,
};
use filwp_server::ai::{AiError, KeywordExtractor, Summarizer, TextGenerator};
use filwp_server::config::{
    AgentConfig, AiConfig, AppConfig, BlobBackend, BlobConfig, ChainConfig, CorsConfig,
    ServerConfig, StorageConfig, StoreBackend,
};
use filwp_server::state::{AppState, Dependency};
use filwp_server::store::SqlContentStore;

pub mod routes {
    pub const CONTENTS: &str = "/api/v1/contents";
    pub const FETCH: &str = "/api/v1/contents/fetch";
    pub const FETCH_BATCH: &str = "/api/v1/contents/fetch-batch";
    pub const SEARCH: &str = "/api/v1/search";
    pub const AGENT: &str = "/api/v1/agent";
    pub const HEALTH: &str = "/api/v1/health";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn search(q: &str) -> String {
        format!("{SEARCH}?q={q}")
    }
}

pub const TEST_WALLET: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const DEPLOYED_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Stands in for Gemini. Keyword prompts get the longer words of the query
/// back; summary prompts get a fixed summary.
pub struct FakeGenerator;

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        if prompt.starts_with("Extract the most relevant keywords") {
            let query = prompt.rsplit("\"\"\"").nth(1).unwrap_or_default();
            let words: Vec<String> = query
                .split_whitespace()
                .map(|w| w.to_lowercase())
                .filter(|w| w.len() > 3)
                .collect();
            return Ok(format!("```json\n{}\n```", serde_json::to_string(&words).unwrap()));
        }
        Ok(r#"Here you go: {"summary": "A short guide to storing files on FileCoin.", "tags": ["filecoin", "storage"]}"#.into())
    }
}

/// Always fails, as when the AI service is down.
pub struct DownGenerator;

#[async_trait]
impl TextGenerator for DownGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::EmptyReply)
    }
}

/// Records deployments and hands back a fixed address, or fails.
pub struct FakeDeployer {
    pub fail: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ContractDeployer for FakeDeployer {
    async fn deploy(&self, content_id: &str, amount: &str) -> Result<String, ChainError> {
        self.calls
            .lock()
            .unwrap()
            .push((content_id.to_string(), amount.to_string()));
        if self.fail {
            return Err(ChainError::Reverted("0xdeadbeef".into()));
        }
        Ok(DEPLOYED_ADDRESS.to_string())
    }
}

/// Answers every conversation with the same text.
pub struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> Result<ChatMessage, AgentError> {
        let last = messages
            .last()
            .and_then(|m| m.content.clone())
            .unwrap_or_default();
        Ok(ChatMessage::assistant(&format!("You asked: {last}")))
    }
}

/// Asks for `purchase_content` on the last word of the user message, then
/// answers with the tool output verbatim.
pub struct BuyerModel;

#[async_trait]
impl ChatModel for BuyerModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> Result<ChatMessage, AgentError> {
        let last = messages.last().ok_or(AgentError::EmptyReply)?;
        if last.role == Role::Tool {
            return Ok(ChatMessage::assistant(last.content.as_deref().unwrap_or_default()));
        }
        let hash = last
            .content
            .as_deref()
            .and_then(|m| m.split_whitespace().last())
            .unwrap_or_default();
        Ok(ChatMessage {
            role: Role::Assistant,
            content: None,
            tool_calls: vec![ToolCall {
                id: "call_1".into(),
                kind: "function".into(),
                function: FunctionCall {
                    name: PURCHASE_CONTENT.into(),
                    arguments: serde_json::json!({ "hash": hash }).to_string(),
                },
            }],
            tool_call_id: None,
        })
    }
}

/// The agent's wallet. Records every transaction it is asked to send.
#[derive(Default)]
pub struct FakeWallet {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl PurchaseBackend for FakeWallet {
    async fn has_access(&self, _contract: &str) -> Result<bool, TxError> {
        Ok(false)
    }

    async fn approve(&self, spender: &str, amount: &str) -> Result<String, TxError> {
        self.sent
            .lock()
            .unwrap()
            .push(("approve".into(), format!("{spender}:{amount}")));
        Ok("0xa11".into())
    }

    async fn purchase_access(&self, contract: &str) -> Result<String, TxError> {
        self.sent
            .lock()
            .unwrap()
            .push(("purchaseAccess".into(), contract.into()));
        Ok("0xb22".into())
    }

    async fn wait_for_confirmation(&self, _tx_hash: &str) -> Result<(), TxError> {
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Ai {
    Working,
    Down,
    Missing,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Deploy {
    Succeeds,
    Fails,
    Missing,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    Disabled,
    Echo,
    Buyer,
}

pub struct TestAppBuilder {
    sql: bool,
    seed: bool,
    ai: Ai,
    deploy: Deploy,
    blobs: bool,
    agent: AgentMode,
}

impl TestAppBuilder {
    pub fn sql(mut self) -> Self {
        self.sql = true;
        self
    }

    pub fn seeded(mut self) -> Self {
        self.seed = true;
        self
    }

    pub fn ai(mut self, ai: Ai) -> Self {
        self.ai = ai;
        self
    }

    pub fn deploy(mut self, deploy: Deploy) -> Self {
        self.deploy = deploy;
        self
    }

    pub fn without_blobs(mut self) -> Self {
        self.blobs = false;
        self
    }

    pub fn agent(mut self, agent: AgentMode) -> Self {
        self.agent = agent;
        self
    }

    pub async fn spawn(self) -> TestApp {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&dir, self.sql);

        let contents: Arc<dyn ContentStore> = if self.sql {
            let db = filwp_server::database::init_db(&config.storage.database_url, 1)
                .await
                .expect("Failed to initialize sqlite database");
            Arc::new(SqlContentStore::new(db))
        } else {
            Arc::new(InMemoryContentStore::new())
        };
        if self.seed {
            filwp_server::seed::seed_samples(contents.as_ref())
                .await
                .expect("Failed to seed samples");
        }

        let blob_store: Arc<dyn BlobStore> = Arc::new(
            FilesystemBlobStore::new(config.blob.path.clone(), config.blob.max_size)
                .await
                .expect("Failed to open blob store"),
        );
        let blobs = if self.blobs {
            Dependency::Ready(blob_store.clone())
        } else {
            Dependency::Missing("Storage API key not configured.".into())
        };

        let generator: Option<Arc<dyn TextGenerator>> = match self.ai {
            Ai::Working => Some(Arc::new(FakeGenerator)),
            Ai::Down => Some(Arc::new(DownGenerator)),
            Ai::Missing => None,
        };
        let (summarizer, keywords) = match &generator {
            Some(g) => (
                Dependency::Ready(Summarizer::new(g.clone())),
                Dependency::Ready(KeywordExtractor::new(g.clone())),
            ),
            None => (
                Dependency::Missing("Gemini API key not configured.".into()),
                Dependency::Missing("Gemini API key not configured.".into()),
            ),
        };

        let deployer = Arc::new(FakeDeployer {
            fail: self.deploy == Deploy::Fails,
            calls: Mutex::new(vec![]),
        });
        let deployer_dep = match self.deploy {
            Deploy::Missing => Dependency::Missing("RPC URL is not configured".into()),
            _ => {
                let d: Arc<dyn ContractDeployer> = deployer.clone();
                Dependency::Ready(d)
            }
        };

        let wallet = Arc::new(FakeWallet::default());
        let agent = match (self.agent, &generator) {
            (AgentMode::Echo | AgentMode::Buyer, Some(g)) => {
                let tools = ToolBox::new(
                    common::chain::WalletDetails {
                        address: TEST_WALLET.into(),
                        chain_id: 314159,
                    },
                    contents.clone(),
                    blob_store.clone(),
                    KeywordExtractor::new(g.clone()),
                    Purchaser {
                        backend: wallet.clone(),
                        confirmation_timeout: Duration::from_secs(5),
                    },
                );
                let model: Arc<dyn ChatModel> = match self.agent {
                    AgentMode::Buyer => Arc::new(BuyerModel),
                    _ => Arc::new(EchoModel),
                };
                AgentProvider::new(move || Ok(Agent::new(model.clone(), tools.clone(), 4)))
            }
            _ => AgentProvider::disabled(),
        };

        let state = AppState {
            config: Arc::new(config),
            contents: contents.clone(),
            blobs,
            summarizer,
            keywords,
            deployer: deployer_dep,
            agent,
        };

        let app = filwp_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestApp {
            addr,
            client: Client::new(),
            contents,
            blobs: blob_store,
            deployer,
            wallet,
            _dir: dir,
        }
    }
}

static DB_COUNTER: AtomicU32 = AtomicU32::new(0);

fn test_config(dir: &TempDir, sql: bool) -> AppConfig {
    let db_file = dir
        .path()
        .join(format!("test_{}.db", DB_COUNTER.fetch_add(1, Ordering::Relaxed)));
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig::default(),
        },
        storage: StorageConfig {
            backend: if sql { StoreBackend::Sql } else { StoreBackend::Memory },
            database_url: format!("sqlite://{}?mode=rwc", db_file.display()),
            max_connections: 1,
            seed_samples: false,
        },
        blob: BlobConfig {
            backend: BlobBackend::Filesystem,
            path: dir.path().join("blobs"),
            max_size: 64 * 1024,
            public_url: None,
            upload_url: String::new(),
            gateway_url: String::new(),
            api_key: None,
            timeout_secs: 5,
        },
        ai: AiConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".into(),
            model: "gemini-test".into(),
            timeout_secs: 5,
        },
        chain: ChainConfig {
            rpc_url: None,
            private_key: None,
            chain_id: None,
            token_address: common::chain::DEFAULT_TOKEN_ADDRESS.into(),
            artifact_path: PathBuf::from("contracts/ContentAccess.json"),
            confirmation_timeout_secs: 5,
            poll_interval_ms: 10,
        },
        agent: AgentConfig {
            enabled: false,
            api_key: None,
            base_url: "http://127.0.0.1:9".into(),
            model: "gpt-4o-mini".into(),
            max_steps: 4,
            timeout_secs: 5,
        },
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub contents: Arc<dyn ContentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub deployer: Arc<FakeDeployer>,
    pub wallet: Arc<FakeWallet>,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            sql: false,
            seed: false,
            ai: Ai::Working,
            deploy: Deploy::Succeeds,
            blobs: true,
            agent: AgentMode::Disabled,
        }
    }

    pub async fn spawn() -> Self {
        Self::builder().spawn().await
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}
