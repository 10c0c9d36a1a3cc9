//! # storefront-state: Client State Stores
//!
//! The owned, injectable stores the storefront screens read and mutate.
//! Each one persists write-through to a `KeyValueStore` and rehydrates
//! from it on startup.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        storefront-state                                 │
//! │                                                                         │
//! │   ┌────────────┐  ┌──────────────┐  ┌────────────┐  ┌────────────┐      │
//! │   │ CartStore  │  │ SessionStore │  │ ThemeStore │  │ OrderStore │      │
//! │   │            │  │              │  │            │  │            │      │
//! │   │ lines,     │  │ login /      │  │ preference │  │ placed     │      │
//! │   │ live-price │  │ register,    │  │ + host     │  │ orders,    │      │
//! │   │ totals     │  │ tokens,      │  │ scheme     │  │ newest     │      │
//! │   │            │  │ addresses    │  │ source     │  │ first      │      │
//! │   └─────┬──────┘  └──────┬───────┘  └─────┬──────┘  └─────┬──────┘      │
//! │         │                │                │               │             │
//! │         └────────────────┴───────┬────────┴───────────────┘             │
//! │                                  ▼                                      │
//! │                    ┌───────────────────────────┐                        │
//! │                    │ PersistHandle (one writer) │                       │
//! │                    └─────────────┬─────────────┘                        │
//! │                                  ▼                                      │
//! │                     storefront-db KeyValueStore                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`cart`] - `CartStore`
//! - [`session`] - `SessionStore`, request tokens and auth outcomes
//! - [`theme`] - `ThemeStore` and host color-scheme sources
//! - [`orders`] - `OrderStore` (order history)
//! - [`persist`] - The write-through persistence actor
//! - [`context`] - `Storefront`, every store wired to one writer
//! - [`config`] - `storefront.toml` and environment overrides
//! - [`error`] - Setup and channel errors

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod context;
pub mod error;
pub mod orders;
pub mod persist;
pub mod session;
pub mod theme;

// =============================================================================
// Storage Keys
// =============================================================================

/// Cart line items.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Signed-in user and the authenticated flag.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Theme preference.
pub const THEME_STORAGE_KEY: &str = "theme-storage";

/// Order history.
pub const ORDERS_STORAGE_KEY: &str = "orders-storage";

// =============================================================================
// Re-exports
// =============================================================================

pub use cart::CartStore;
pub use config::StorefrontConfig;
pub use context::{host_color_scheme, RehydrateReport, Storefront};
pub use error::{StateError, StateResult};
pub use orders::{OrderHistory, OrderStore};
pub use persist::PersistHandle;
pub use session::{AuthOutcome, PendingAuth, RequestToken, SessionStore};
pub use theme::{
    ColorSchemeSource, EnvColorScheme, FixedColorScheme, ThemeSnapshot, ThemeStore,
    WatchColorScheme,
};
