//! # Write-Through Persistence
//!
//! A single background task that owns every write to the key-value store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Persistence Writer                                 │
//! │                                                                         │
//! │  CartStore ──┐                                                          │
//! │              │ Write { key, payload }                                   │
//! │  Session  ───┼─────────────────────▶ ┌─────────────────┐                │
//! │              │   (unbounded mpsc,    │                 │                │
//! │  Theme    ───┘    sync send)         │  writer task    │── set() ──▶ KV │
//! │                                      │  (one consumer) │                │
//! │  flush()    ── Flush(ack) ─────────▶ │                 │                │
//! │  shutdown() ── Shutdown(ack) ──────▶ └─────────────────┘                │
//! │                                                                         │
//! │  • Mutations never wait: the snapshot is serialized under the store's   │
//! │    lock and handed off.                                                 │
//! │  • One consumer, FIFO channel: writes land in the order they were made. │
//! │  • A failed write is logged at warn and dropped; callers never see it.  │
//! │  • Flush acks only after everything queued before it has been written.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use storefront_db::{snapshot, KeyValueStore};

use crate::error::{StateError, StateResult};

// =============================================================================
// Commands
// =============================================================================

#[derive(Debug)]
enum PersistCommand {
    /// Replace the record under `key`.
    Write { key: &'static str, payload: String },
    /// Acknowledge once every earlier command is done.
    Flush(oneshot::Sender<()>),
    /// Drain, acknowledge, stop.
    Shutdown(oneshot::Sender<()>),
}

// =============================================================================
// Handle
// =============================================================================

/// Cloneable sender side of the persistence writer.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    cmd_tx: mpsc::UnboundedSender<PersistCommand>,
}

impl PersistHandle {
    /// Spawns the writer on the current tokio runtime.
    pub fn spawn<S>(store: S) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(store, cmd_rx));
        PersistHandle { cmd_tx }
    }

    /// A handle whose writes go nowhere. For stores that should not persist.
    pub fn detached() -> Self {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        PersistHandle { cmd_tx }
    }

    /// Serializes `state` and queues it under `key`. Fire-and-forget.
    pub fn write<T: Serialize>(&self, key: &'static str, state: &T) {
        let payload = match snapshot::encode(state) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "Could not serialize snapshot, write skipped");
                return;
            }
        };

        if self
            .cmd_tx
            .send(PersistCommand::Write { key, payload })
            .is_err()
        {
            debug!(key, "Persistence writer stopped, write dropped");
        }
    }

    /// Waits until every write queued before this call has been applied.
    pub async fn flush(&self) -> StateResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.cmd_tx
            .send(PersistCommand::Flush(ack_tx))
            .map_err(|_| StateError::Channel("Persistence writer closed".into()))?;
        ack_rx
            .await
            .map_err(|_| StateError::Channel("Persistence writer dropped flush".into()))
    }

    /// Drains pending writes and stops the writer.
    pub async fn shutdown(&self) -> StateResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.cmd_tx
            .send(PersistCommand::Shutdown(ack_tx))
            .map_err(|_| StateError::Channel("Persistence writer closed".into()))?;
        ack_rx
            .await
            .map_err(|_| StateError::Channel("Persistence writer dropped shutdown".into()))
    }

    /// Whether the writer task is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.cmd_tx.is_closed()
    }
}

// =============================================================================
// Writer Loop
// =============================================================================

async fn run<S: KeyValueStore>(store: S, mut cmd_rx: mpsc::UnboundedReceiver<PersistCommand>) {
    info!("Persistence writer started");

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            PersistCommand::Write { key, payload } => {
                match store.set(key, &payload).await {
                    Ok(()) => debug!(key, bytes = payload.len(), "Snapshot persisted"),
                    Err(e) => warn!(key, error = %e, "Snapshot write failed"),
                }
            }
            PersistCommand::Flush(ack) => {
                let _ = ack.send(());
            }
            PersistCommand::Shutdown(ack) => {
                info!("Persistence writer shutting down");
                cmd_rx.close();
                // Commands queued ahead of the close still drain.
                while let Some(pending) = cmd_rx.recv().await {
                    match pending {
                        PersistCommand::Write { key, payload } => {
                            if let Err(e) = store.set(key, &payload).await {
                                warn!(key, error = %e, "Snapshot write failed during shutdown");
                            }
                        }
                        PersistCommand::Flush(ack) | PersistCommand::Shutdown(ack) => {
                            let _ = ack.send(());
                        }
                    }
                }
                let _ = ack.send(());
                break;
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_db::{DbConfig, MemoryStore, SqliteStore};

    #[tokio::test]
    async fn test_writes_apply_in_order() {
        let store = MemoryStore::new();
        let persist = PersistHandle::spawn(store.clone());

        for n in 0..50u32 {
            persist.write("counter", &n);
        }
        persist.flush().await.unwrap();

        let last: Option<u32> = snapshot::load(&store, "counter").await.unwrap();
        assert_eq!(last, Some(49));
    }

    #[tokio::test]
    async fn test_shutdown_drains_then_stops() {
        let store = MemoryStore::new();
        let persist = PersistHandle::spawn(store.clone());

        persist.write("k", &"v");
        persist.shutdown().await.unwrap();

        assert!(store.get("k").await.unwrap().is_some());
        assert!(persist.flush().await.is_err());

        // Writes after shutdown are dropped, not panics.
        persist.write("k2", &"v");
        assert!(store.get("k2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_write_is_not_surfaced() {
        let store = SqliteStore::open(DbConfig::in_memory()).await.unwrap();
        store.close().await;

        let persist = PersistHandle::spawn(store);
        persist.write("cart-storage", &vec![1, 2, 3]);

        // The writer logs and keeps serving.
        persist.flush().await.unwrap();
        assert!(persist.is_running());
    }

    #[tokio::test]
    async fn test_detached_handle_accepts_writes() {
        let persist = PersistHandle::detached();
        persist.write("anything", &1);
        assert!(persist.flush().await.is_err());
    }
}
