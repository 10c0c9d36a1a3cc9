//! # Key-Value Stores
//!
//! The durable surface every state store persists through.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KeyValueStore                                    │
//! │                  get / set / remove / keys                              │
//! │                             │                                           │
//! │              ┌──────────────┴──────────────┐                            │
//! │              ▼                             ▼                            │
//! │     ┌─────────────────┐           ┌─────────────────┐                   │
//! │     │   SqliteStore   │           │   MemoryStore   │                   │
//! │     │  kv_store table │           │ RwLock<HashMap> │                   │
//! │     │  (app + CLI)    │           │  (tests)        │                   │
//! │     └─────────────────┘           └─────────────────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are opaque strings here. The envelope format lives in
//! [`crate::snapshot`].

use std::future::Future;

use crate::error::DbResult;

pub mod memory;
pub mod sqlite;

/// Async string key-value storage.
///
/// The returned futures are `Send` so a store can be driven from a
/// spawned writer task.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> impl Future<Output = DbResult<Option<String>>> + Send;

    /// Inserts or replaces the value for `key`.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = DbResult<()>> + Send;

    /// Deletes `key`. Absent keys are not an error.
    fn remove(&self, key: &str) -> impl Future<Output = DbResult<()>> + Send;

    /// All keys, sorted.
    fn keys(&self) -> impl Future<Output = DbResult<Vec<String>>> + Send;
}
