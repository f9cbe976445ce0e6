//! Integration test harness for Aurelle.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p aurelle-integration-tests
//! ```
//!
//! # Harness
//!
//! - [`FakeBackend`] - In-process stand-in for the backend REST API. It
//!   answers with the backend's envelope and records orders, searches and
//!   idempotency keys so tests can assert on what the storefront sent.
//! - [`TestStorefront`] - The real storefront router bound to a local port
//!   and pointed at a [`FakeBackend`], with a cookie-keeping client.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use aurelle_storefront::api::ApiClient;
use aurelle_storefront::config::{ApiConfig, PaymentConfig, SearchConfig, StorefrontConfig};
use aurelle_storefront::content::ContentStore;
use aurelle_storefront::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Bearer token the fake backend accepts.
pub const TEST_TOKEN: &str = "test-token";

/// Razorpay key id configured on test storefronts.
pub const TEST_RAZORPAY_KEY: &str = "rzp_test_key";

// =============================================================================
// Fake backend
// =============================================================================

/// Everything the fake backend stores or records.
#[derive(Debug, Default)]
pub struct BackendData {
    pub addresses: Vec<Value>,
    pub products: Vec<Value>,
    pub tickets: Vec<Value>,
    /// Orders by id, as `GET order/{id}` returns them.
    pub orders: Vec<Value>,
    /// Every `POST order` body with its `Idempotency-Key` header.
    pub order_requests: Vec<(Option<String>, Value)>,
    /// Every `search` parameter sent to `GET product`.
    pub search_queries: Vec<String>,
    /// Delay before `POST order` answers.
    pub order_delay: Duration,
    /// When set, `GET cart` answers `200` with `success: false`.
    pub cart_down: bool,
    next_id: u64,
}

impl BackendData {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// An in-process fake of the backend REST API.
#[derive(Clone)]
pub struct FakeBackend {
    data: Arc<Mutex<BackendData>>,
    base_url: Url,
}

impl FakeBackend {
    /// Start a backend seeded with a small catalog and one primary address.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let data = Arc::new(Mutex::new(BackendData {
            products: vec![
                product("p-1", "Rose Water Toner", "rose-water-toner", "899.00"),
                product("p-2", "Rosehip Face Oil", "rosehip-face-oil", "1299.00"),
                product("p-3", "Vitamin C Serum", "vitamin-c-serum", "1499.00"),
            ],
            addresses: vec![json!({
                "_id": "addr-home",
                "title": "Home",
                "addressLine1": "12 Carter Road",
                "city": "Mumbai",
                "state": "Maharashtra",
                "postalCode": "400050",
                "country": "India",
                "addressType": "home",
                "isPrimary": true
            })],
            ..BackendData::default()
        }));

        let api = Router::new()
            .route("/address", get(list_addresses).post(create_address))
            .route("/address/{id}", put(update_address).delete(delete_address))
            .route("/cart", get(get_cart))
            .route("/product", get(list_products))
            .route("/order", post(create_order))
            .route("/order/{id}", get(get_order))
            .route("/support", get(list_tickets).post(create_ticket))
            .route("/support/{id}/reply", post(reply_to_ticket))
            .with_state(data.clone());
        let router = Router::new().nest("/api", api);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        let base_url =
            Url::parse(&format!("http://{addr}/api/")).expect("Fake backend URL is valid");
        Self { data, base_url }
    }

    /// Base URL the storefront should call.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Lock the backend's data to seed or inspect it.
    ///
    /// # Panics
    ///
    /// Panics if a handler panicked while holding the lock.
    pub fn data(&self) -> MutexGuard<'_, BackendData> {
        self.data.lock().expect("Fake backend state poisoned")
    }

    /// API configuration pointing at this backend.
    #[must_use]
    pub fn api_config(&self, token: Option<&str>) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(5),
            token: token.map(SecretString::from),
        }
    }

    /// A backend client, optionally authenticated.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn api_client(&self, token: Option<&str>) -> ApiClient {
        let config = self.api_config(token);
        ApiClient::new(&config)
            .expect("Failed to build API client")
            .with_token(config.token.clone())
    }
}

type Shared = State<Arc<Mutex<BackendData>>>;

fn lock(data: &Arc<Mutex<BackendData>>) -> MutexGuard<'_, BackendData> {
    data.lock().expect("Fake backend state poisoned")
}

fn product(id: &str, name: &str, slug: &str, price: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "slug": slug,
        "price": price,
        "images": [],
        "stock": 10,
        "rating": 4.5,
        "reviewCount": 12
    })
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str, code: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "message": message, "code": code })),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}

fn unauthorized() -> Response {
    fail(StatusCode::UNAUTHORIZED, "Please log in again", "UNAUTHORIZED")
}

async fn list_addresses(State(data): Shared, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let addresses = lock(&data).addresses.clone();
    ok(json!({ "addresses": addresses }))
}

async fn create_address(
    State(data): Shared,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut data = lock(&data);
    body["_id"] = Value::String(data.next_id("addr"));
    if body["isPrimary"] == Value::Bool(true) {
        for address in &mut data.addresses {
            address["isPrimary"] = Value::Bool(false);
        }
    }
    data.addresses.push(body.clone());
    ok(body)
}

async fn update_address(
    State(data): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut data = lock(&data);
    let Some(existing) = data.addresses.iter_mut().find(|a| a["_id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Address not found", "NOT_FOUND");
    };
    body["_id"] = Value::String(id);
    existing.clone_from(&body);
    ok(body)
}

async fn delete_address(
    State(data): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut data = lock(&data);
    let before = data.addresses.len();
    data.addresses.retain(|a| a["_id"] != id.as_str());
    if data.addresses.len() == before {
        return fail(StatusCode::NOT_FOUND, "Address not found", "NOT_FOUND");
    }
    ok(Value::Null)
}

async fn get_cart(State(data): Shared) -> Response {
    if lock(&data).cart_down {
        // The backend reports some failures with a 200 status.
        return (
            StatusCode::OK,
            Json(json!({
                "success": false,
                "message": "Cart service unavailable",
                "code": "UPSTREAM"
            })),
        )
            .into_response();
    }
    ok(json!({
        "items": [
            {
                "productId": "p-2",
                "name": "Rosehip Face Oil",
                "quantity": 1,
                "itemTotal": "1299.00"
            },
            {
                "productId": "p-1",
                "name": "Rose Water Toner",
                "quantity": 2,
                "itemTotal": "1798.00"
            }
        ],
        "subtotal": "3097.00"
    }))
}

#[derive(Debug, Deserialize)]
struct ProductParams {
    search: Option<String>,
    limit: Option<usize>,
}

async fn list_products(State(data): Shared, Query(params): Query<ProductParams>) -> Response {
    let mut data = lock(&data);
    let products: Vec<Value> = match &params.search {
        Some(search) => {
            data.search_queries.push(search.clone());
            let needle = search.to_lowercase();
            data.products
                .iter()
                .filter(|p| {
                    p["name"]
                        .as_str()
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect()
        }
        None => data.products.clone(),
    };
    let limit = params.limit.unwrap_or(12).max(1);
    let total = products.len();
    let page: Vec<Value> = products.into_iter().take(limit).collect();
    ok(json!({
        "products": page,
        "pagination": {
            "page": 1,
            "limit": limit,
            "total": total,
            "totalPages": total.div_ceil(limit)
        }
    }))
}

async fn create_order(
    State(data): Shared,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let delay = lock(&data).order_delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mut data = lock(&data);
    data.order_requests.push((key.clone(), body.clone()));

    // A repeated key answers with the order it already created.
    if let Some(key) = &key
        && let Some(existing) = data
            .orders
            .iter()
            .find(|o| o["idempotencyKey"] == key.as_str())
    {
        return ok(placed(existing));
    }

    let id = data.next_id("order");
    let online = body["paymentMethod"] == "online";
    let order = json!({
        "_id": id,
        "orderNumber": format!("AUR-{}", 1000 + data.orders.len() + 1),
        "idempotencyKey": key,
        "items": [
            { "productId": "p-2", "name": "Rosehip Face Oil", "quantity": 1, "price": "1299.00" }
        ],
        "status": "pending",
        "paymentMethod": body["paymentMethod"],
        "shippingAddress": body["shippingAddress"],
        "subtotal": "1299.00",
        "shippingCost": "0.00",
        "discount": "0.00",
        "total": "1299.00",
        "createdAt": "2026-10-01T10:00:00Z",
        "razorpayOrderId": if online { Value::String(format!("rzp_{id}")) } else { Value::Null }
    });
    data.orders.push(order.clone());
    ok(placed(&order))
}

fn placed(order: &Value) -> Value {
    let mut placed = json!({
        "orderId": order["_id"],
        "orderNumber": order["orderNumber"],
    });
    if let Some(rzp) = order["razorpayOrderId"].as_str() {
        placed["razorpayOrder"] = json!({ "id": rzp, "amount": 129_900, "currency": "INR" });
    }
    placed
}

async fn get_order(State(data): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    lock(&data)
        .orders
        .iter()
        .find(|o| o["_id"] == id.as_str())
        .map_or_else(
            || fail(StatusCode::NOT_FOUND, "Order not found", "NOT_FOUND"),
            |order| ok(order.clone()),
        )
}

async fn list_tickets(State(data): Shared, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    ok(Value::Array(lock(&data).tickets.clone()))
}

async fn create_ticket(
    State(data): Shared,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut data = lock(&data);
    let ticket = json!({
        "_id": data.next_id("ticket"),
        "subject": body["subject"],
        "status": "open",
        "orderId": body["orderId"],
        "replies": [{
            "message": body["message"],
            "sender": "customer",
            "createdAt": "2026-10-02T09:00:00Z"
        }],
        "createdAt": "2026-10-02T09:00:00Z"
    });
    data.tickets.push(ticket.clone());
    ok(ticket)
}

async fn reply_to_ticket(
    State(data): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut data = lock(&data);
    let Some(ticket) = data.tickets.iter_mut().find(|t| t["_id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Ticket not found", "NOT_FOUND");
    };
    if let Some(replies) = ticket["replies"].as_array_mut() {
        replies.push(json!({
            "message": body["message"],
            "sender": "customer",
            "createdAt": "2026-10-02T10:00:00Z"
        }));
    }
    ok(ticket.clone())
}

// =============================================================================
// Storefront
// =============================================================================

const ABOUT: &str = "---
title: About Aurelle
description: Small-batch skincare
updated_at: 2026-01-15
---

# Our story
";
const PRIVACY: &str = "---\ntitle: Privacy Policy\n---\n\nWe never sell your data.\n";
const TERMS: &str = "---\ntitle: Terms of Service\n---\n\nBe kind.\n";
const SUPPORT: &str = "---\ntitle: Support\n---\n\nWrite to care@aurelle.in\n";

/// A running storefront pointed at a [`FakeBackend`].
pub struct TestStorefront {
    pub base_url: String,
}

impl TestStorefront {
    /// Start a storefront on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot start.
    pub async fn spawn(backend: &FakeBackend) -> Self {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("Valid host"),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            content_dir: "content".into(),
            api: backend.api_config(None),
            search: SearchConfig {
                debounce: Duration::from_millis(50),
                suggestion_limit: 8,
            },
            payments: PaymentConfig {
                razorpay_key_id: Some(TEST_RAZORPAY_KEY.to_string()),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let content = ContentStore::from_sources([
            ("about", ABOUT),
            ("privacy", PRIVACY),
            ("terms", TERMS),
            ("support", SUPPORT),
        ])
        .expect("Test pages parse");

        let state = AppState::new(config, content).expect("Failed to build app state");
        let app = aurelle_storefront::app(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront");
        let addr = listener.local_addr().expect("Storefront has no address");
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        Self {
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A browser-like client that keeps the session cookie, optionally
    /// signed in with the visitor's bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self, signed_in: bool) -> reqwest::Client {
        let mut headers = reqwest::header::HeaderMap::new();
        if signed_in {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                reqwest::header::HeaderValue::from_str(&format!("Bearer {TEST_TOKEN}"))
                    .expect("Valid authorization header"),
            );
        }
        reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client")
    }
}
