use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use common::ContentRecord;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Upload<'a> {
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    pub wallet_address: &'a str,
    pub amount: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct Uploaded {
    pub message: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub cid: String,
    pub download: String,
    #[serde(rename = "contractAddress")]
    pub contract_address: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResults {
    pub results: Vec<ContentRecord>,
    pub total: usize,
}

#[derive(Deserialize)]
struct Fetched {
    content: String,
}

#[derive(Deserialize)]
struct FetchedBatch {
    contents: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct AgentReply {
    response: String,
}

/// Thin client for the `/api/v1` HTTP surface.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(server: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/api/v1", server.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn upload(&self, upload: &Upload<'_>) -> Result<Uploaded> {
        let res = self
            .client
            .post(self.url("/contents"))
            .json(upload)
            .send()
            .await
            .context("Failed to reach the server")?;
        read(res).await
    }

    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let res = self
            .client
            .get(self.url("/search"))
            .query(&[("q", query)])
            .send()
            .await
            .context("Failed to reach the server")?;
        read(res).await
    }

    pub async fn fetch(&self, hash: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/contents/fetch"))
            .json(&json!({ "hash": hash }))
            .send()
            .await
            .context("Failed to reach the server")?;
        read::<Fetched>(res).await.map(|f| f.content)
    }

    pub async fn fetch_batch(&self, hashes: &[String]) -> Result<BTreeMap<String, String>> {
        let res = self
            .client
            .post(self.url("/contents/fetch-batch"))
            .json(&json!({ "hashes": hashes }))
            .send()
            .await
            .context("Failed to reach the server")?;
        read::<FetchedBatch>(res).await.map(|b| b.contents)
    }

    pub async fn ask_agent(&self, message: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/agent"))
            .json(&json!({ "userMessage": message }))
            .send()
            .await
            .context("Failed to reach the server")?;
        read::<AgentReply>(res).await.map(|r| r.response)
    }
}

async fn read<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let text = res.text().await.context("Failed to read response body")?;
    if !status.is_success() {
        bail!("{}", describe_error(status.as_u16(), &text));
    }
    serde_json::from_str(&text).with_context(|| format!("Unexpected response: {text}"))
}

/// One-line description of a failed response.
fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => match err.error {
            Some(detail) => format!("{} ({}): {} [{}]", err.code, status, err.message, detail),
            None => format!("{} ({}): {}", err.code, status, err.message),
        },
        Err(_) => format!("Server returned {status}: {body}"),
    }
}
