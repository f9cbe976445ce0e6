//! CLI command implementations.

pub mod addresses;
pub mod catalog;
pub mod content;
pub mod orders;
pub mod tickets;

use aurelle_storefront::address::AddressBookError;
use aurelle_storefront::api::ApiError;
use aurelle_storefront::config::ConfigError;
use aurelle_storefront::content::ContentError;
use aurelle_storefront::support::SupportError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("AURELLE_API_TOKEN is required for this command")]
    MissingToken,

    #[error(transparent)]
    Address(#[from] AddressBookError),

    #[error(transparent)]
    Support(#[from] SupportError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("{0} content issue(s) found")]
    ContentIssues(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Write one line of command output.
#[allow(clippy::print_stdout)]
pub fn out(line: impl std::fmt::Display) {
    println!("{line}");
}
