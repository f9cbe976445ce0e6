//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /about|/privacy|/terms|/support - Marketing pages (HTML)
//!
//! # Catalog
//! GET  /api/products                 - Listing page (filters in query string)
//! GET  /api/products/{slug}          - Product detail
//! GET  /api/categories               - Categories
//! GET  /api/search?q=                - Search suggestions
//!
//! # Cart
//! GET  /api/cart                     - Cart view
//! POST /api/cart/items               - Add to cart
//!
//! # Addresses (requires token)
//! GET    /api/addresses              - Address book
//! POST   /api/addresses              - Create
//! PUT    /api/addresses/{id}         - Update
//! DELETE /api/addresses/{id}         - Delete
//! POST   /api/addresses/{id}/select  - Select for checkout
//!
//! # Checkout
//! GET   /api/checkout                - Wizard state
//! PATCH /api/checkout                - Update form fields
//! POST  /api/checkout/next           - Details -> Review
//! POST  /api/checkout/back           - Review -> Details
//! POST  /api/checkout/submit         - Place the order
//!
//! # Orders (requires token)
//! GET  /api/orders                   - Order history
//! GET  /api/orders/{id}              - Order detail
//! GET  /api/orders/{id}/tracking     - Tracking timeline
//! POST /api/orders/{id}/reviews      - Review a delivered item
//!
//! # Support (requires token)
//! GET  /api/support                  - Tickets
//! POST /api/support                  - Open a ticket
//! GET  /api/support/{id}             - Ticket thread
//! POST /api/support/{id}/reply       - Reply
//!
//! # Profile (requires token)
//! GET   /api/profile
//! PATCH /api/profile
//! ```
//!
//! Every JSON response uses the backend's envelope: `{ success, data,
//! notice? }` on success and `{ success: false, message, ... }` on error.

pub mod addresses;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod pages;
pub mod products;
pub mod profile;
pub mod search;
pub mod support;

use axum::{
    Json, Router,
    http::{HeaderValue, header},
    routing::{get, patch, post, put},
};
use serde::Serialize;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::middleware::{api_rate_limiter, mutation_rate_limiter, visitor_id_middleware};
use crate::notice::Notice;
use crate::state::AppState;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap `data` in a success envelope.
    pub const fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            notice: None,
        })
    }

    /// Wrap `data` with a toast to show.
    pub const fn with_notice(data: T, notice: Notice) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            notice: Some(notice),
        })
    }
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
pub async fn health() -> &'static str {
    "ok"
}

/// Read-only JSON endpoints.
fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/categories", get(products::categories))
        .route("/search", get(search::suggest))
        .route("/cart", get(cart::show))
        .route("/addresses", get(addresses::index))
        .route("/checkout", get(checkout::show))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/tracking", get(orders::tracking))
        .route("/support", get(support::index))
        .route("/support/{id}", get(support::show))
        .route("/profile", get(profile::show))
        .layer(api_rate_limiter())
}

/// Endpoints that change backend or wizard state.
fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/cart/items", post(cart::add))
        .route("/addresses", post(addresses::create))
        .route(
            "/addresses/{id}",
            put(addresses::update).delete(addresses::remove),
        )
        .route("/addresses/{id}/select", post(addresses::select))
        .route("/checkout", patch(checkout::update))
        .route("/checkout/next", post(checkout::next))
        .route("/checkout/back", post(checkout::back))
        .route("/checkout/submit", post(checkout::submit))
        .route("/orders/{id}/reviews", post(orders::review))
        .route("/support", post(support::create))
        .route("/support/{id}/reply", post(support::reply))
        .route("/profile", patch(profile::update))
        .layer(mutation_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(pages::router())
        .nest(
            "/api",
            read_routes()
                .merge(write_routes())
                // Responses are per visitor
                .layer(axum::middleware::from_fn(visitor_id_middleware))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
}
