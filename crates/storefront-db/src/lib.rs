//! # storefront-db: Persistence Layer for the Storefront
//!
//! Durable key-value storage for state snapshots, plus the record format
//! and the rehydration policy the stores rely on.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Data Flow                               │
//! │                                                                         │
//! │  CartStore / SessionStore / ThemeStore (storefront-state)               │
//! │       │ rehydrate                        │ write-through                │
//! │       ▼                                  ▼                              │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   snapshot    │    │     store     │    │  Migrations  │   │   │
//! │  │   │               │    │               │    │  (embedded)  │   │   │
//! │  │   │ envelope      │───►│ KeyValueStore │    │              │   │   │
//! │  │   │ LoadOutcome   │    │ SqliteStore   │    │ 001_kv_store │   │   │
//! │  │   │               │    │ MemoryStore   │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/storefront.db  ·  table kv_store                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - `DbConfig` and the SQLite-backed `SqliteStore`
//! - [`store`] - `KeyValueStore` trait, SQLite and in-memory impls
//! - [`snapshot`] - Envelope, `load`, `load_or_default`
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{snapshot, DbConfig, SqliteStore};
//!
//! let store = SqliteStore::open(DbConfig::new("storefront.db")).await?;
//! snapshot::save(&store, "theme-storage", &theme).await?;
//! let restored = snapshot::load_or_default::<ThemeSnapshot, _>(&store, "theme-storage").await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod snapshot;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{DbConfig, SqliteStore};
pub use snapshot::{LoadOutcome, LoadStatus, PersistedRecord, SnapshotError};
pub use store::memory::MemoryStore;
pub use store::KeyValueStore;
