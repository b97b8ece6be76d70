use crate::common::{Ai, TestApp, routes};

#[tokio::test]
async fn health_reports_collaborators() {
    let app = TestApp::builder().seeded().ai(Ai::Missing).spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["contents"], 3);
    assert_eq!(res.body["ai"], false);
    assert_eq!(res.body["blobs"], true);
    assert_eq!(res.body["chain"], true);
}

#[tokio::test]
async fn openapi_document_lists_every_route() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    for path in [
        routes::CONTENTS,
        routes::FETCH,
        routes::FETCH_BATCH,
        routes::SEARCH,
        routes::AGENT,
        routes::HEALTH,
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}
