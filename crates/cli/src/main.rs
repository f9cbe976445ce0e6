//! Aurelle CLI - Talk to the storefront backend from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! aurelle products --category serums --sort price_asc --in-stock
//!
//! # Search as you type (one line per keystroke state)
//! aurelle search
//!
//! # Manage addresses (requires AURELLE_API_TOKEN)
//! aurelle addresses add --title Home --line1 "12 Carter Road" \
//!     --city Mumbai --state Maharashtra --postal-code 400050
//!
//! # Follow an order
//! aurelle orders track 65f1c0de
//!
//! # Validate marketing pages before deploying
//! aurelle content check
//! ```
//!
//! # Commands
//!
//! - `products` - List products with filters
//! - `search` - Debounced interactive search
//! - `addresses` - List, add, edit and remove addresses
//! - `orders` - Order history, detail and tracking
//! - `tickets` - Support tickets
//! - `content check` - Validate the marketing pages directory

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use aurelle_storefront::api::ApiClient;
use aurelle_storefront::config::{ApiConfig, SearchConfig};
use aurelle_storefront::listing::SortOrder;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "aurelle")]
#[command(author, version, about = "Aurelle storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products(commands::catalog::ProductArgs),
    /// Search products interactively; each stdin line is the search box
    Search {
        /// Quiet period before a search is sent, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Manage saved addresses
    Addresses {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Order history and tracking
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Support tickets
    Tickets {
        #[command(subcommand)]
        action: TicketAction,
    },
    /// Marketing content tools
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
}

#[derive(Subcommand)]
enum AddressAction {
    /// List saved addresses
    List,
    /// Add an address
    Add(commands::addresses::AddressArgs),
    /// Edit an address; omitted fields keep their value
    Edit {
        /// Address id
        id: String,
        #[command(flatten)]
        fields: commands::addresses::AddressArgs,
    },
    /// Remove an address
    Remove {
        /// Address id
        id: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show one order
    Show { id: String },
    /// Show the tracking timeline
    Track { id: String },
}

#[derive(Subcommand)]
enum TicketAction {
    /// List tickets
    List,
    /// Open a ticket
    Open {
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        message: String,
        /// Related order id
        #[arg(short, long)]
        order: Option<String>,
    },
    /// Reply to a ticket
    Reply {
        id: String,
        #[arg(short, long)]
        message: String,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// Check that every page parses and required pages exist
    Check {
        /// Content directory
        #[arg(short, long, default_value = "crates/storefront/content")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aurelle_cli=info,aurelle_storefront=warn".into()),
        )
        .init();

    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Backend client using `AURELLE_API_TOKEN` when set.
fn client() -> Result<ApiClient, CliError> {
    let config = ApiConfig::from_env()?;
    Ok(ApiClient::new(&config)?.with_token(config.token.clone()))
}

/// Backend client that must carry a token.
fn authed_client() -> Result<ApiClient, CliError> {
    let api = client()?;
    if api.has_token() {
        Ok(api)
    } else {
        Err(CliError::MissingToken)
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Products(args) => commands::catalog::products(&client()?, &args).await?,
        Commands::Search { debounce_ms } => {
            let mut config = SearchConfig::from_env()?;
            if let Some(ms) = debounce_ms {
                config.debounce = std::time::Duration::from_millis(ms);
            }
            commands::catalog::search(client()?, config).await?;
        }
        Commands::Addresses { action } => {
            let api = authed_client()?;
            match action {
                AddressAction::List => commands::addresses::list(&api).await?,
                AddressAction::Add(fields) => commands::addresses::add(&api, &fields).await?,
                AddressAction::Edit { id, fields } => {
                    commands::addresses::edit(&api, &id, &fields).await?;
                }
                AddressAction::Remove { id } => commands::addresses::remove(&api, &id).await?,
            }
        }
        Commands::Orders { action } => {
            let api = authed_client()?;
            match action {
                OrderAction::List { page } => commands::orders::list(&api, page).await?,
                OrderAction::Show { id } => commands::orders::show(&api, &id).await?,
                OrderAction::Track { id } => commands::orders::track(&api, &id).await?,
            }
        }
        Commands::Tickets { action } => {
            let api = authed_client()?;
            match action {
                TicketAction::List => commands::tickets::list(&api).await?,
                TicketAction::Open {
                    subject,
                    message,
                    order,
                } => commands::tickets::open(&api, &subject, &message, order).await?,
                TicketAction::Reply { id, message } => {
                    commands::tickets::reply(&api, &id, &message).await?;
                }
            }
        }
        Commands::Content { action } => match action {
            ContentAction::Check { dir } => commands::content::check(&dir)?,
        },
    }
    Ok(())
}

/// Parse a `--sort` value.
fn parse_sort(raw: &str) -> Result<SortOrder, String> {
    raw.parse()
        .map_err(|_| {
            let options: Vec<_> = SortOrder::ALL.iter().map(|s| s.as_str()).collect();
            format!("expected one of: {}", options.join(", "))
        })
}

/// Parse a rupee amount.
fn parse_amount(raw: &str) -> Result<Decimal, String> {
    raw.parse::<Decimal>()
        .map_err(|e| e.to_string())
        .and_then(|d| {
            if d.is_sign_negative() {
                Err("amount cannot be negative".to_string())
            } else {
                Ok(d)
            }
        })
}
