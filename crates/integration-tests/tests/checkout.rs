//! Checkout wizard driven through the storefront router.

use std::time::Duration;

use aurelle_integration_tests::{FakeBackend, TEST_RAZORPAY_KEY, TestStorefront};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn body(resp: reqwest::Response) -> Value {
    resp.json().await.expect("Response is JSON")
}

/// Fill the details step and move to review.
async fn reach_review(client: &Client, store: &TestStorefront, payment_method: &str) -> Value {
    let resp = client
        .get(store.url("/api/checkout"))
        .send()
        .await
        .expect("Failed to load checkout");
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body(resp).await;
    assert_eq!(page["data"]["step"], "details");
    // The primary address is used for shipping.
    assert_eq!(page["data"]["form"]["selectedAddressId"], "addr-home");

    let resp = client
        .patch(store.url("/api/checkout"))
        .json(&json!({
            "fullName": "Meera Iyer",
            "email": "meera@example.com",
            "phone": "9820012345",
            "paymentMethod": payment_method
        }))
        .send()
        .await
        .expect("Failed to update checkout");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(resp).await["data"]["missingFields"], json!([]));

    let resp = client
        .post(store.url("/api/checkout/next"))
        .send()
        .await
        .expect("Failed to advance checkout");
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body(resp).await;
    assert_eq!(page["data"]["step"], "review");
    page
}

#[tokio::test]
async fn test_cash_on_delivery_checkout() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;
    let client = store.client(true);

    let review = reach_review(&client, &store, "cod").await;
    let summary = &review["data"]["review"];
    assert_eq!(summary["itemCount"], 3);
    assert_eq!(summary["paymentLabel"], "Cash on delivery");
    assert_eq!(summary["shippingAddress"]["city"], "Mumbai");

    let resp = client
        .post(store.url("/api/checkout/submit"))
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(resp.status(), StatusCode::OK);
    let placed = body(resp).await;
    assert_eq!(placed["notice"]["message"], "Order placed");
    let outcome = &placed["data"]["outcome"];
    assert_eq!(outcome["kind"], "confirmed");
    let order_id = outcome["orderId"].as_str().expect("Order id");
    assert_eq!(
        outcome["redirect"].as_str(),
        Some(format!("/orders/{order_id}?placed=1").as_str())
    );

    {
        let data = backend.data();
        assert_eq!(data.order_requests.len(), 1);
        let (key, request) = &data.order_requests[0];
        assert!(key.is_some(), "Order must carry an idempotency key");
        assert_eq!(request["paymentMethod"], "cod");
        assert_eq!(request["contact"]["fullName"], "Meera Iyer");
        assert_eq!(request["sameAsShipping"], true);
        assert_eq!(request["billingAddress"]["postalCode"], "400050");
    }

    // The finished checkout is shown once, then starts over.
    let page = body(client.get(store.url("/api/checkout")).send().await.expect("Reload")).await;
    assert_eq!(page["data"]["step"], "submitted");
    let page = body(client.get(store.url("/api/checkout")).send().await.expect("Reload")).await;
    assert_eq!(page["data"]["step"], "details");
    assert_eq!(page["data"]["form"]["contact"]["fullName"], "");
}

#[tokio::test]
async fn test_online_checkout_hands_off_to_payment() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;
    let client = store.client(true);

    reach_review(&client, &store, "online").await;
    let resp = client
        .post(store.url("/api/checkout/submit"))
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(resp.status(), StatusCode::OK);
    let placed = body(resp).await;
    assert_eq!(placed["notice"]["message"], "Redirecting to payment");
    let outcome = &placed["data"]["outcome"];
    assert_eq!(outcome["kind"], "payment_required");
    assert_eq!(outcome["amount"], 129_900);
    assert!(
        outcome["razorpayOrderId"]
            .as_str()
            .is_some_and(|id| id.starts_with("rzp_"))
    );
    assert_eq!(placed["data"]["razorpayKeyId"], TEST_RAZORPAY_KEY);
}

#[tokio::test]
async fn test_next_reports_empty_required_fields() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;
    // Signed out: no saved address to prefill shipping from.
    let client = store.client(false);

    let resp = client
        .post(store.url("/api/checkout/next"))
        .send()
        .await
        .expect("Failed to advance checkout");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err = body(resp).await;
    assert_eq!(err["success"], false);
    assert_eq!(err["errors"]["fullName"], "This field is required");
    assert_eq!(err["errors"]["shippingAddress"], "This field is required");

    let page = body(client.get(store.url("/api/checkout")).send().await.expect("Reload")).await;
    assert_eq!(page["data"]["step"], "details");
}

#[tokio::test]
async fn test_concurrent_submit_is_refused() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;
    let client = store.client(true);

    reach_review(&client, &store, "cod").await;
    backend.data().order_delay = Duration::from_millis(300);

    let first = client.post(store.url("/api/checkout/submit")).send();
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.post(store.url("/api/checkout/submit")).send().await
    };
    let (first, second) = tokio::join!(first, second);
    let first = first.expect("First submit");
    let second = second.expect("Second submit");

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let err = body(second).await;
    assert_eq!(err["code"], "IN_FLIGHT");

    assert_eq!(backend.data().order_requests.len(), 1);
}

#[tokio::test]
async fn test_submit_outside_review_is_rejected() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;
    let client = store.client(true);

    let resp = client
        .post(store.url("/api/checkout/submit"))
        .send()
        .await
        .expect("Failed to submit");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(backend.data().order_requests.is_empty());
}

#[tokio::test]
async fn test_going_back_keeps_the_form() {
    let backend = FakeBackend::spawn().await;
    let store = TestStorefront::spawn(&backend).await;
    let client = store.client(true);

    reach_review(&client, &store, "cod").await;
    let resp = client
        .post(store.url("/api/checkout/back"))
        .send()
        .await
        .expect("Failed to go back");
    let page = body(resp).await;
    assert_eq!(page["data"]["step"], "details");
    assert_eq!(page["data"]["form"]["contact"]["email"], "meera@example.com");
    assert_eq!(page["data"]["form"]["paymentMethod"], "cod");
}
