//! # SQLite Store
//!
//! Opens the pool that backs the durable key-value store.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("<data dir>/storefront.db")                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStore::open(config)                                              │
//! │       ├── File:     WAL journal, NORMAL sync, create if missing         │
//! │       ├── InMemory: one connection (each connection is its own db)      │
//! │       └── embedded migrations (001_kv_store)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rehydrate reads ─────┐                                                 │
//! │                       ├──► pool (2 connections by default)              │
//! │  persistence writer ──┘                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  close() on exit                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Lost when the pool closes. Used by tests.
    InMemory,
}

// =============================================================================
// Configuration
// =============================================================================

/// How to open a [`SqliteStore`].
///
/// ```rust,ignore
/// let config = DbConfig::new(data_dir.join("storefront.db")).max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: StoreLocation,

    /// Pool size. Two covers the writer plus a concurrent reader.
    pub max_connections: u32,

    /// How long to wait for a free connection.
    pub acquire_timeout: Duration,

    /// Apply embedded migrations after connecting.
    pub migrate: bool,
}

impl DbConfig {
    /// A file-backed store at `path`. The file is created on open; its
    /// parent directory must already exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: StoreLocation::File(path.into()),
            max_connections: 2,
            acquire_timeout: Duration::from_secs(10),
            migrate: true,
        }
    }

    /// A private in-memory store.
    pub fn in_memory() -> Self {
        DbConfig {
            location: StoreLocation::InMemory,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn migrate(mut self, migrate: bool) -> Self {
        self.migrate = migrate;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location == StoreLocation::InMemory
    }

    /// The database file, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            StoreLocation::File(path) => Some(path),
            StoreLocation::InMemory => None,
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        match &self.location {
            StoreLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true),
            StoreLocation::InMemory => SqliteConnectOptions::new().in_memory(true),
        }
    }

    /// In-memory pools are pinned to one connection; a second connection
    /// would see an empty database.
    fn pool_size(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections.max(1)
        }
    }
}

// =============================================================================
// SQLite Store
// =============================================================================

/// SQLite-backed key-value store. Clones share the pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects and, unless disabled, applies migrations.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size())
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(None)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        match config.path() {
            Some(path) => info!(path = %path.display(), connections = config.pool_size(), "Snapshot store opened"),
            None => info!("In-memory snapshot store opened"),
        }

        let store = SqliteStore { pool };
        if config.migrate {
            store.run_migrations().await?;
        }
        Ok(store)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool. Later operations fail with `ConnectionFailed`.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Snapshot store closed");
    }

    /// `true` if the database answers `SELECT 1`.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_is_migrated() {
        let store = SqliteStore::open(DbConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);

        let (total, applied) = migrations::migration_status(store.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_file_is_created_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.db");

        let store = SqliteStore::open(DbConfig::new(&path)).await.unwrap();
        assert!(store.health_check().await);
        assert!(path.exists());

        store.close().await;
        assert!(!store.health_check().await);
    }

    #[test]
    fn test_config() {
        let config = DbConfig::new("/tmp/storefront.db")
            .max_connections(4)
            .migrate(false);
        assert_eq!(config.pool_size(), 4);
        assert_eq!(config.path(), Some(Path::new("/tmp/storefront.db")));
        assert!(!config.migrate);

        let memory = DbConfig::in_memory().max_connections(8);
        assert!(memory.is_in_memory());
        assert_eq!(memory.pool_size(), 1);
        assert_eq!(memory.path(), None);
    }
}
