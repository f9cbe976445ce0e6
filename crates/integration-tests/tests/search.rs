//! Search-as-you-type against the fake backend.

use std::time::Duration;

use aurelle_integration_tests::{FakeBackend, TestStorefront};
use aurelle_storefront::search::ProductSearch;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_debounced_burst_sends_only_the_last_query() {
    let backend = FakeBackend::spawn().await;
    let search = ProductSearch::new(backend.api_client(None), 8);
    let mut updates = search.subscribe();
    let debounced = search.debounced(Duration::from_millis(50));

    for text in ["r", "ro", "ros", "rose"] {
        debounced.call(text.to_string());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let state = tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|s| s.query == "rose" && !s.loading),
    )
    .await
    .expect("Search settled in time")
    .expect("Search still alive")
    .clone();

    let names: Vec<_> = state.results.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Rose Water Toner", "Rosehip Face Oil"]);
    assert_eq!(backend.data().search_queries, vec!["rose".to_string()]);
}

#[tokio::test]
async fn test_suggest_endpoint() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;
    let client = store.client(false);

    let resp = client
        .get(store.url("/api/search?q=serum"))
        .send()
        .await
        .expect("Search request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("JSON");
    assert_eq!(body["data"]["query"], "serum");
    assert_eq!(body["data"]["results"][0]["slug"], "vitamin-c-serum");

    // A blank query answers empty without calling the backend.
    let resp = client
        .get(store.url("/api/search?q=%20%20"))
        .send()
        .await
        .expect("Search request");
    let body: Value = resp.json().await.expect("JSON");
    assert_eq!(body["data"]["results"], Value::Array(Vec::new()));
    assert_eq!(backend.data().search_queries, vec!["serum".to_string()]);
}
