//! Aurelle storefront library.
//!
//! The storefront is a thin layer over the backend REST API: it renders
//! marketing pages, keeps per-visitor UI state (checkout wizard, address
//! selection) in the session and forwards everything else to the backend
//! through [`api::ApiClient`].
//!
//! # Modules
//!
//! - [`api`] - Backend client, wire types and the response envelope
//! - [`address`], [`checkout`], [`cart`], [`orders`], [`support`],
//!   [`profile`] - Page state and the operations behind each page
//! - [`listing`], [`search`], [`debounce`] - Catalog browsing
//! - [`routes`], [`middleware`] - The HTTP server

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod content;
pub mod debounce;
pub mod error;
pub mod filters;
pub mod form;
pub mod guard;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod notice;
pub mod orders;
pub mod profile;
pub mod routes;
pub mod search;
pub mod state;
pub mod support;
pub mod sync;

use axum::{Router, http::Request};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use state::AppState;

/// Build the full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
