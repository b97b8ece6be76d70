use serde_json::json;

use crate::common::{Ai, TestApp, routes};

#[tokio::test]
async fn best_match_is_returned() {
    let app = TestApp::builder().seeded().spawn().await;

    let res = app.get(&routes::search("filecoin%20storage")).await;

    assert_eq!(res.status, 200, "Search failed: {}", res.text);
    assert_eq!(res.body["total"], 1);
    let result = &res.body["results"][0];
    assert_eq!(result["title"], "FileCoin Storage Tutorial");
    assert_eq!(result["hash"], "QmFileCoinTutorial987654321");
    assert_eq!(result["contractAddress"], "");
}

#[tokio::test]
async fn higher_score_wins_over_earlier_record() {
    let app = TestApp::builder().seeded().spawn().await;
    let up = app
        .post(
            routes::CONTENTS,
            &json!({
                "content": "defi notes",
                "title": "Liquidity and yield farming in DeFi",
                "wallet_address": "0xabc",
                "amount": "1",
            }),
        )
        .await;
    assert_eq!(up.status, 201, "Upload failed: {}", up.text);

    // "defi" matches both DeFi records; only the upload also matches "filecoin"
    // through its generated tags.
    let res = app.get(&routes::search("defi%20filecoin")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["results"][0]["title"], "Liquidity and yield farming in DeFi");
}

#[tokio::test]
async fn nothing_matching_returns_empty() {
    let app = TestApp::builder().seeded().spawn().await;

    let res = app.get(&routes::search("gardening")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"results": [], "total": 0}));
}

#[tokio::test]
async fn no_keywords_returns_empty() {
    let app = TestApp::builder().seeded().spawn().await;

    // Every word is too short to survive keyword extraction.
    let res = app.get(&routes::search("the%20of%20an")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["total"], 0);
}

#[tokio::test]
async fn ai_outage_returns_empty() {
    let app = TestApp::builder().seeded().ai(Ai::Down).spawn().await;

    let res = app.get(&routes::search("filecoin")).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["total"], 0);
}

#[tokio::test]
async fn missing_query_is_rejected() {
    let app = TestApp::spawn().await;

    for path in [routes::SEARCH.to_string(), routes::search(""), routes::search("%20")] {
        let res = app.get(&path).await;
        assert_eq!(res.status, 400, "{path}");
        assert_eq!(res.body["message"], "Query parameter 'q' is required.");
    }
}

#[tokio::test]
async fn missing_ai_key_is_reported() {
    let app = TestApp::builder().ai(Ai::Missing).spawn().await;

    let res = app.get(&routes::search("filecoin")).await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn sql_store_serves_search() {
    let app = TestApp::builder().sql().seeded().spawn().await;

    let res = app.get(&routes::search("filecoin%20storage")).await;

    assert_eq!(res.status, 200, "Search failed: {}", res.text);
    assert_eq!(res.body["results"][0]["title"], "FileCoin Storage Tutorial");
    assert_eq!(
        res.body["results"][0]["tags"],
        json!(["filecoin", "storage", "monetization", "ipfs"])
    );
}
