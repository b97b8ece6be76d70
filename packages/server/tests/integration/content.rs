use serde_json::json;

use crate::common::{Ai, DEPLOYED_ADDRESS, Deploy, TestApp, routes};

fn upload_body(content: &str) -> serde_json::Value {
    json!({
        "content": content,
        "title": "FileCoin Storage Tutorial",
        "wallet_address": "0xabcdef1234567890",
        "amount": "1.5",
    })
}

mod upload {
    use super::*;

    #[tokio::test]
    async fn upload_stores_summarizes_and_deploys() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::CONTENTS, &upload_body("How to pin files on FileCoin."))
            .await;

        assert_eq!(res.status, 201, "Upload failed: {}", res.text);
        assert_eq!(
            res.body["message"],
            "Content monetized and tool created successfully!"
        );
        assert_eq!(res.body["summary"], "A short guide to storing files on FileCoin.");
        assert_eq!(res.body["tags"], json!(["filecoin", "storage"]));
        assert_eq!(res.body["contractAddress"], DEPLOYED_ADDRESS);

        let cid = res.body["cid"].as_str().unwrap();
        let calls = app.deployer.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(cid.to_string(), "1.5".to_string())]);

        let record = app.contents.find_by_hash(cid).await.unwrap().unwrap();
        assert_eq!(record.contract_address, DEPLOYED_ADDRESS);
        assert_eq!(record.amount, "1.5");
        assert_eq!(record.title, "FileCoin Storage Tutorial");
        assert!(record.is_purchasable());
    }

    #[tokio::test]
    async fn missing_title_defaults_to_untitled() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::CONTENTS,
                &json!({"content": "notes", "wallet_address": "0xabc", "amount": "2"}),
            )
            .await;

        assert_eq!(res.status, 201, "Upload failed: {}", res.text);
        let cid = res.body["cid"].as_str().unwrap();
        let record = app.contents.find_by_hash(cid).await.unwrap().unwrap();
        assert_eq!(record.title, "Untitled");
    }

    #[tokio::test]
    async fn ai_outage_falls_back_to_generic_summary() {
        let app = TestApp::builder().ai(Ai::Down).spawn().await;

        let res = app.post(routes::CONTENTS, &upload_body("some text")).await;

        assert_eq!(res.status, 201, "Upload failed: {}", res.text);
        assert_eq!(res.body["summary"], "Summary could not be generated.");
        assert_eq!(res.body["tags"], json!(["general"]));
    }

    #[tokio::test]
    async fn failed_deployment_records_nothing() {
        let app = TestApp::builder().deploy(Deploy::Fails).spawn().await;

        let res = app.post(routes::CONTENTS, &upload_body("some text")).await;

        assert_eq!(res.status, 502);
        assert_eq!(res.body["code"], "CHAIN_ERROR");
        assert!(res.body["error"].as_str().unwrap().contains("0xdeadbeef"));
        assert_eq!(app.contents.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn identical_content_is_not_deployed_twice() {
        let app = TestApp::spawn().await;

        let first = app.post(routes::CONTENTS, &upload_body("same text")).await;
        assert_eq!(first.status, 201, "Upload failed: {}", first.text);

        let second = app.post(routes::CONTENTS, &upload_body("same text")).await;
        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "CONFLICT");
        assert_eq!(app.deployer.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::CONTENTS, &upload_body("   ")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Content is required.");
        assert!(app.deployer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unparseable_amount_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::CONTENTS,
                &json!({"content": "text", "wallet_address": "0xabc", "amount": "a lot"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::CONTENTS, "{\"content\": ").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod configuration {
    use super::*;

    #[tokio::test]
    async fn missing_storage_key_is_reported() {
        let app = TestApp::builder().without_blobs().spawn().await;

        let res = app.post(routes::CONTENTS, &upload_body("text")).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "CONFIGURATION_ERROR");
        assert_eq!(res.body["message"], "Storage API key not configured.");
    }

    #[tokio::test]
    async fn missing_ai_key_is_reported() {
        let app = TestApp::builder().ai(Ai::Missing).spawn().await;

        let res = app.post(routes::CONTENTS, &upload_body("text")).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "CONFIGURATION_ERROR");
        assert_eq!(res.body["message"], "Gemini API key not configured.");
    }

    #[tokio::test]
    async fn missing_signer_is_reported() {
        let app = TestApp::builder().deploy(Deploy::Missing).spawn().await;

        let res = app.post(routes::CONTENTS, &upload_body("text")).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "CONFIGURATION_ERROR");
        assert_eq!(app.contents.count().await.unwrap(), 0);
    }
}

mod fetch {
    use super::*;

    const UNKNOWN: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    #[tokio::test]
    async fn uploaded_text_can_be_fetched() {
        let app = TestApp::spawn().await;
        let up = app.post(routes::CONTENTS, &upload_body("The full tutorial.")).await;
        let cid = up.body["cid"].as_str().unwrap();

        let res = app.post(routes::FETCH, &json!({"hash": cid})).await;

        assert_eq!(res.status, 200, "Fetch failed: {}", res.text);
        assert_eq!(res.body["content"], "The full tutorial.");
    }

    #[tokio::test]
    async fn blank_hash_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::FETCH, &json!({"hash": ""})).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Hash is required");
    }

    #[tokio::test]
    async fn unknown_hash_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::FETCH, &json!({"hash": UNKNOWN})).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn batch_isolates_failures() {
        let app = TestApp::spawn().await;
        let up = app.post(routes::CONTENTS, &upload_body("Chapter one.")).await;
        let cid = up.body["cid"].as_str().unwrap().to_string();

        let res = app
            .post(
                routes::FETCH_BATCH,
                &json!({"hashes": [cid, UNKNOWN, "not-a-hash"]}),
            )
            .await;

        assert_eq!(res.status, 200, "Batch failed: {}", res.text);
        let contents = res.body["contents"].as_object().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[&cid], "Chapter one.");
        assert_eq!(contents[UNKNOWN], "Failed to fetch content.");
        assert_eq!(contents["not-a-hash"], "Failed to fetch content.");
    }

    #[tokio::test]
    async fn empty_batch_returns_nothing() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::FETCH_BATCH, &json!({"hashes": []})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["contents"], json!({}));
    }
}
