//! Core types for Aurelle.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod postal_code;
pub mod price;
pub mod status;

pub use address::{Address, AddressDraft, AddressErrors, AddressField, AddressType};
pub use email::{Email, EmailError};
pub use id::*;
pub use postal_code::{PostalCode, PostalCodeError};
pub use price::{CurrencyCode, Price};
pub use status::*;
