//! Marketing pages, health and auth-gated routes.

use aurelle_integration_tests::{FakeBackend, TestStorefront};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_health() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;

    let resp = store
        .client(false)
        .get(store.url("/health"))
        .send()
        .await
        .expect("Health request");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.expect("Body"), "ok");
}

#[tokio::test]
async fn test_marketing_page_renders() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;

    let resp = store
        .client(false)
        .get(store.url("/about"))
        .send()
        .await
        .expect("Page request");
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.expect("Body");
    assert!(html.contains("About Aurelle"));
    assert!(html.contains("Our story"));
    assert!(html.contains("15 January 2026"));
}

#[tokio::test]
async fn test_api_responses_are_not_cached() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;

    let resp = store
        .client(false)
        .get(store.url("/api/products?category=serums"))
        .send()
        .await
        .expect("Listing request");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
}

#[tokio::test]
async fn test_addresses_require_sign_in() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;

    let resp = store
        .client(false)
        .get(store.url("/api/addresses"))
        .send()
        .await
        .expect("Address request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("JSON");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_invalid_address_is_rejected_before_the_backend() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;

    let resp = store
        .client(true)
        .post(store.url("/api/addresses"))
        .json(&json!({
            "title": "Office",
            "addressLine1": "",
            "city": "Pune",
            "state": "Maharashtra",
            "postalCode": "4110"
        }))
        .send()
        .await
        .expect("Address request");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.expect("JSON");
    assert_eq!(body["errors"]["addressLine1"], "Address line 1 is required");
    assert_eq!(
        body["errors"]["postalCode"],
        "Please enter a valid 6-digit postal code"
    );
    assert_eq!(backend.data().addresses.len(), 1);
}

#[tokio::test]
async fn test_backend_not_found_keeps_its_status() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;

    let resp = store
        .client(true)
        .put(store.url("/api/addresses/does-not-exist"))
        .json(&json!({
            "title": "Office",
            "addressLine1": "12 MG Road",
            "city": "Pune",
            "state": "Maharashtra",
            "postalCode": "411001"
        }))
        .send()
        .await
        .expect("Address request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Address not found");
    assert_eq!(body["code"], "NOT_FOUND");
}
