//! # storefront-core: Pure Domain Logic for the Storefront
//!
//! Everything the storefront's state layer computes, with no I/O. Stores in
//! `storefront-state` own instances of these types and decide when to
//! persist them; this crate only decides what the values are.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Presentation (mobile screens / `storefront` CLI)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ reads state, calls mutations           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     storefront-state: CartStore, SessionStore, ThemeStore       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌───────┐ │   │
//! │  │   │ catalog │  │  cart   │  │  user   │  │  theme  │  │ check │ │   │
//! │  │   │ Product │  │ Variant │  │ Address │  │ resolve │  │  out  │ │   │
//! │  │   │ search  │  │ Key     │  │ Patch   │  │         │  │ Order │ │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘  └───────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  storefront-db persists serialized snapshots of these types.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent `Money` and basis-point `TaxRate`
//! - [`product`] - Product, Category, Banner
//! - [`catalog`] - Static catalog, queries, `PriceLookup`
//! - [`cart`] - Cart lines keyed by variant, derived totals
//! - [`user`] - User profile and address book
//! - [`session`] - Session snapshot and auth phase
//! - [`theme`] - Theme preference resolution
//! - [`checkout`] - Checkout summary and orders
//! - [`validation`] - Form and credential checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, Catalog};
//!
//! let catalog = Catalog::demo();
//! let backpack = catalog.get_by_id("1").unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_item(backpack, 2, None, None);
//! cart.add_item(backpack, 1, None, None);
//!
//! assert_eq!(cart.item_count(), 3);
//! assert_eq!(cart.total_price(&catalog).to_string(), "$389.97");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod product;
pub mod session;
pub mod theme;
pub mod user;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLineItem, VariantKey};
pub use catalog::{Catalog, PriceLookup, ProductFilter};
pub use checkout::{CheckoutSummary, Order, OrderLine, OrderStatus, PaymentMethod};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, TaxRate};
pub use product::{Banner, Category, Product};
pub use session::{AuthPhase, SessionState};
pub use theme::{ColorScheme, ThemePreference};
pub use user::{Address, User, UserPatch};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Simulated round-trip for sign-in and sign-up, in milliseconds.
pub const DEFAULT_AUTH_LATENCY_MS: u64 = 1000;
