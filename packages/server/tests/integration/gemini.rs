use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use filwp_server::ai::{AiError, GeminiClient, KeywordExtractor, Summarizer, TextGenerator};
use filwp_server::config::AiConfig;

#[derive(Deserialize)]
struct KeyParam {
    key: String,
}

/// Serves `generateContent` for the model named "echo" and fails for the
/// model named "broken".
async fn generate(
    Path(call): Path<String>,
    Query(params): Query<KeyParam>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if params.key != "test-key" {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "bad key"})));
    }
    if call.starts_with("broken") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "overloaded"})),
        );
    }
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    let text = if prompt.starts_with("Extract") {
        "[\"FileCoin\", \"storage\"]".to_string()
    } else {
        "```json\n{\"summary\": \"Pinning on FileCoin.\", \"tags\": [\"filecoin\"]}\n```".to_string()
    };
    (
        StatusCode::OK,
        Json(json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})),
    )
}

async fn spawn_gemini() -> SocketAddr {
    let app = Router::new().route("/models/{call}", post(generate));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(addr: SocketAddr, model: &str, api_key: Option<&str>) -> AiConfig {
    AiConfig {
        api_key: api_key.map(str::to_string),
        base_url: format!("http://{addr}/"),
        model: model.into(),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn generate_returns_first_candidate_text() {
    let addr = spawn_gemini().await;
    let client = GeminiClient::new(&config(addr, "echo", Some("test-key"))).unwrap();

    let text = client.generate("Extract keywords").await.unwrap();
    assert_eq!(text, "[\"FileCoin\", \"storage\"]");
}

#[tokio::test]
async fn summarizer_parses_real_client_reply() {
    let addr = spawn_gemini().await;
    let client = GeminiClient::new(&config(addr, "echo", Some("test-key"))).unwrap();
    let summarizer = Summarizer::new(Arc::new(client));

    let summary = summarizer.summarize("some text").await;
    assert_eq!(summary.summary, "Pinning on FileCoin.");
    assert_eq!(summary.tags, vec!["filecoin".to_string()]);
}

#[tokio::test]
async fn keywords_are_normalized() {
    let addr = spawn_gemini().await;
    let client = GeminiClient::new(&config(addr, "echo", Some("test-key"))).unwrap();
    let keywords = KeywordExtractor::new(Arc::new(client));

    assert_eq!(
        keywords.extract("filecoin storage please").await,
        vec!["filecoin".to_string(), "storage".to_string()]
    );
}

#[tokio::test]
async fn upstream_error_falls_back() {
    let addr = spawn_gemini().await;
    let client = GeminiClient::new(&config(addr, "broken", Some("test-key"))).unwrap();

    let err = client.generate("anything").await.unwrap_err();
    assert!(matches!(err, AiError::Status { status: 500, .. }));

    let summary = Summarizer::new(Arc::new(client)).summarize("text").await;
    assert_eq!(summary.summary, "Summary could not be generated.");
    assert_eq!(summary.tags, vec!["general".to_string()]);
}

#[tokio::test]
async fn unreachable_service_falls_back() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GeminiClient::new(&config(addr, "echo", Some("test-key"))).unwrap();
    let summary = Summarizer::new(Arc::new(client)).summarize("text").await;
    assert_eq!(summary.tags, vec!["general".to_string()]);
}

#[test]
fn missing_key_is_rejected() {
    let addr: SocketAddr = "127.0.0.1:9".parse().unwrap();
    assert!(matches!(
        GeminiClient::new(&config(addr, "echo", None)),
        Err(AiError::MissingKey)
    ));
    assert!(matches!(
        GeminiClient::new(&config(addr, "echo", Some(" "))),
        Err(AiError::MissingKey)
    ));
}
