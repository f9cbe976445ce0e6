//! Backend REST API client.
//!
//! # Architecture
//!
//! - One [`ApiClient`] wraps `reqwest` and is the only way the storefront
//!   talks to the backend (the storefront's `clientFetch`)
//! - The backend is the source of truth - NO local persistence
//! - Every response is the envelope `{ success, data, message, code }`;
//!   `success: false` is an error regardless of HTTP status
//! - Catalog reads (categories, product detail) are cached in memory via
//!   `moka` (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use aurelle_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?.with_token(Some(token));
//!
//! let addresses = client.list_addresses().await?;
//! let cart = client.add_to_cart(&AddToCartRequest::new(product_id, 1)).await?;
//! ```

mod addresses;
mod cache;
mod cart;
mod catalog;
mod client;
mod orders;
mod profile;
mod support;
pub mod types;

pub use client::{ApiClient, IDEMPOTENCY_KEY_HEADER};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot have paths appended.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The backend answered with `success: false` or a non-2xx status.
    #[error("Request rejected ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Backend-provided, user-facing message.
        message: Option<String>,
        /// Backend-provided error code.
        code: Option<String>,
    },

    /// The visitor's token is missing or no longer valid.
    #[error("Unauthorized: {}", .0.as_deref().unwrap_or("login required"))]
    Unauthorized(Option<String>),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The backend's user-facing message, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } | Self::Unauthorized(message) => message.as_deref(),
            _ => None,
        }
    }

    /// The backend's error code, if it sent one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if a response arrived.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { status: 404, .. })
    }
}
