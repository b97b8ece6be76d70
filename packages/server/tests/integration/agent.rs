use serde_json::json;

use serde_json::Value;

use crate::common::{AgentMode, DEPLOYED_ADDRESS, TestApp, routes};

#[tokio::test]
async fn agent_answers_messages() {
    let app = TestApp::builder().agent(AgentMode::Echo).spawn().await;

    let res = app
        .post(routes::AGENT, &json!({"userMessage": "find filecoin guides"}))
        .await;

    assert_eq!(res.status, 200, "Agent failed: {}", res.text);
    assert_eq!(res.body["response"], "You asked: find filecoin guides");
}

#[tokio::test]
async fn disabled_agent_is_a_configuration_error() {
    let app = TestApp::spawn().await;

    let res = app.post(routes::AGENT, &json!({"userMessage": "hello"})).await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = TestApp::builder().agent(AgentMode::Echo).spawn().await;

    let res = app.post(routes::AGENT, &json!({"userMessage": "  "})).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn agent_buys_uploaded_content_with_its_wallet() {
    let app = TestApp::builder().agent(AgentMode::Buyer).spawn().await;
    let uploaded = app
        .post(
            routes::CONTENTS,
            &json!({"content": "Pinning guide", "title": "Pins", "wallet_address": "0xabc", "amount": "3"}),
        )
        .await;
    assert_eq!(uploaded.status, 201, "Upload failed: {}", uploaded.text);
    let cid = uploaded.body["cid"].as_str().unwrap();

    let res = app
        .post(routes::AGENT, &json!({"userMessage": format!("please buy {cid}")}))
        .await;

    assert_eq!(res.status, 200, "Agent failed: {}", res.text);
    let outcome: Value = serde_json::from_str(res.body["response"].as_str().unwrap()).unwrap();
    assert_eq!(outcome["session"]["state"], "purchased");
    assert_eq!(outcome["session"]["target"]["contract_address"], DEPLOYED_ADDRESS);
    assert_eq!(
        *app.wallet.sent.lock().unwrap(),
        vec![
            ("approve".to_string(), format!("{DEPLOYED_ADDRESS}:3")),
            ("purchaseAccess".to_string(), DEPLOYED_ADDRESS.to_string()),
        ]
    );
}

#[tokio::test]
async fn agent_refuses_to_buy_unpriced_samples() {
    let app = TestApp::builder().seeded().agent(AgentMode::Buyer).spawn().await;

    let res = app
        .post(routes::AGENT, &json!({"userMessage": "buy QmFileCoinTutorial987654321"}))
        .await;

    assert_eq!(res.status, 200, "Agent failed: {}", res.text);
    assert!(res.body["response"].as_str().unwrap().contains("has no purchase contract"));
    assert!(app.wallet.sent.lock().unwrap().is_empty());
}
