//! # Storefront CLI Library
//!
//! A command-line stand-in for the storefront screens. Each invocation is a
//! full app session: rehydrate, run one action, persist, exit.
//!
//! ## Module Organization
//! ```text
//! storefront_cli/
//! ├── lib.rs          ◄─── You are here (argument parsing, startup, dispatch)
//! ├── commands/
//! │   ├── catalog.rs  ◄─── Browse, search, categories
//! │   ├── cart.rs     ◄─── Add, remove, update, clear
//! │   ├── auth.rs     ◄─── Login, register, logout, whoami
//! │   ├── profile.rs  ◄─── Profile patch and address book
//! │   ├── theme.rs    ◄─── Theme preference
//! │   └── checkout.rs ◄─── Place order, order history
//! └── error.rs        ◄─── AppError (code + message)
//! ```
//!
//! ## Session Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing          RUST_LOG or "warn,storefront=info,sqlx=warn"  │
//! │  2. StorefrontConfig      file → env → validate                         │
//! │  3. SqliteStore::open     create parent dir, WAL, migrations            │
//! │  4. Storefront::open      rehydrate cart / session / theme / orders     │
//! │  5. dispatch(command)     one action, output as text                    │
//! │  6. shutdown              drain the persistence writer                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use storefront_core::{Catalog, PaymentMethod, ProductFilter, ThemePreference};
use storefront_db::{DbConfig, SqliteStore};
use storefront_state::{Storefront, StorefrontConfig};

use crate::error::AppResult;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Storefront client state from the command line")]
pub struct Cli {
    /// Path to storefront.toml (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Sign in, sign up, sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Update the signed-in profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Manage the signed-in user's addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// Show or set the display theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Place an order for the current cart
    Checkout {
        /// Address id to ship to (defaults to the default address)
        #[arg(long)]
        address: Option<String>,

        /// card, paypal, apple-pay or cod
        #[arg(long, default_value = "card")]
        payment: PaymentMethod,
    },
    /// List placed orders, newest first
    Orders,
}

#[derive(Debug, Subcommand)]
pub enum CatalogAction {
    /// List products
    List {
        /// featured, new, discount, price-low or price-high
        #[arg(long, default_value = "all")]
        filter: ProductFilter,

        /// Only products in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product
    Show { id: String },
    /// Search names, descriptions and categories
    Search { query: String },
    /// List categories
    Categories,
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show lines and totals
    Show,
    /// Add a product
    Add {
        id: String,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        qty: u32,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        size: Option<String>,
    },
    /// Remove every line for a product
    Remove { id: String },
    /// Set the quantity for a product (values below 1 become 1)
    Update {
        id: String,
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum AuthAction {
    Login { email: String, password: String },
    Register {
        name: String,
        email: String,
        password: String,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Show the profile
    Show,
    /// Change profile fields
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AddressAction {
    List,
    Add(AddressArgs),
    Remove { id: String },
    /// Make an address the default
    Default { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct AddressArgs {
    /// Label, e.g. Home or Work
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub line1: String,

    #[arg(long)]
    pub line2: Option<String>,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub postal_code: String,

    #[arg(long)]
    pub country: String,

    #[arg(long)]
    pub phone: Option<String>,

    /// Make this the default address
    #[arg(long)]
    pub default: bool,
}

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    Show,
    /// light, dark or system
    Set { theme: ThemePreference },
}

// =============================================================================
// Startup
// =============================================================================

/// Installs the fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,storefront=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the configured SQLite store, creating its directory if needed.
pub async fn open_store(config: &StorefrontConfig) -> AppResult<SqliteStore> {
    let path = config.database_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    info!(?path, "Opening storefront database");
    let db_config = DbConfig::new(path).max_connections(config.storage.max_connections);
    Ok(SqliteStore::open(db_config).await?)
}

/// Runs one CLI invocation end to end.
pub async fn run(cli: Cli) -> AppResult<String> {
    let config = StorefrontConfig::load_or_default(cli.config);
    let store = open_store(&config).await?;

    let (storefront, report) = Storefront::open(store.clone(), &config, Catalog::demo()).await;
    if report.any_fallback() {
        debug!(?report, "Some state could not be restored and was reset");
    }

    let result = dispatch(&storefront, cli.command).await;

    storefront.shutdown().await?;
    store.close().await;
    result
}

/// Routes a parsed command to its handler.
pub async fn dispatch(storefront: &Storefront, command: Command) -> AppResult<String> {
    match command {
        Command::Catalog { action } => commands::catalog::run(storefront, action),
        Command::Cart { action } => commands::cart::run(storefront, action),
        Command::Auth { action } => commands::auth::run(storefront, action).await,
        Command::Profile { action } => commands::profile::run(storefront, action),
        Command::Address { action } => commands::profile::run_address(storefront, action),
        Command::Theme { action } => commands::theme::run(storefront, action),
        Command::Checkout { address, payment } => {
            commands::checkout::place(storefront, address.as_deref(), payment)
        }
        Command::Orders => Ok(commands::checkout::list_orders(storefront)),
    }
}
