//! Aurelle Core - Shared types library.
//!
//! This crate provides the domain types shared by every Aurelle component:
//! - `storefront` - Public storefront server and backend API client
//! - `cli` - Command-line client over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. The backend API owns persistence; these types mirror its JSON
//! shape (camelCase keys, `_id` identifiers).
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, emails, postal codes, statuses and addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
