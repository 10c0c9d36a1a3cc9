//! # Snapshot Records
//!
//! The envelope every store's state is persisted in, and the policy for
//! reading it back.
//!
//! ## Record Format
//! ```text
//!   key              value
//!   ─────────────    ─────────────────────────────────────────────────────
//!   cart-storage     { "state": { "items": [...] },            "version": 0 }
//!   auth-storage     { "state": { "user": ..., "isAuthenticated": true },
//!                      "version": 0 }
//!   theme-storage    { "state": { "theme": "dark" },           "version": 0 }
//! ```
//!
//! ## Load Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load_or_default(store, key)                                            │
//! │       │                                                                 │
//! │       ├── row absent                 ──► LoadOutcome::Missing           │
//! │       ├── read failed                ──► LoadOutcome::Fallback (warn)   │
//! │       ├── JSON does not parse        ──► LoadOutcome::Fallback (warn)   │
//! │       ├── version newer than ours    ──► LoadOutcome::Fallback (warn)   │
//! │       └── ok                         ──► LoadOutcome::Restored(state)   │
//! │                                                                         │
//! │  Missing and Fallback both start the store from its default state.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::DbError;
use crate::store::KeyValueStore;

/// Envelope version written by this build.
pub const CURRENT_VERSION: u32 = 0;

// =============================================================================
// Envelope
// =============================================================================

/// `{ "state": ..., "version": N }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord<T> {
    pub state: T,
    pub version: u32,
}

impl<T> PersistedRecord<T> {
    pub fn new(state: T) -> Self {
        PersistedRecord {
            state,
            version: CURRENT_VERSION,
        }
    }
}

/// Serializes `state` into a current-version envelope.
pub fn encode<T: Serialize>(state: &T) -> serde_json::Result<String> {
    serde_json::to_string(&PersistedRecord::new(state))
}

/// Parses an envelope, rejecting versions this build does not know.
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, SnapshotError> {
    let record: PersistedRecord<T> =
        serde_json::from_str(raw).map_err(|source| SnapshotError::Deserialize {
            key: key.to_string(),
            source,
        })?;

    if record.version > CURRENT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            key: key.to_string(),
            found: record.version,
            supported: CURRENT_VERSION,
        });
    }

    Ok(record.state)
}

// =============================================================================
// Errors
// =============================================================================

/// Why a persisted record could not be restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The store itself failed.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    /// The record exists but is not valid for this state shape.
    #[error("Record '{key}' could not be parsed: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Written by a newer build.
    #[error("Record '{key}' has version {found}, this build reads up to {supported}")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },
}

// =============================================================================
// Loading
// =============================================================================

/// Reads and decodes a record. `Ok(None)` means the key is absent.
pub async fn load<T, S>(store: &S, key: &str) -> Result<Option<T>, SnapshotError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key).await? {
        Some(raw) => decode(key, &raw).map(Some),
        None => Ok(None),
    }
}

/// Writes a record, awaiting completion.
pub async fn save<T, S>(store: &S, key: &str, state: &T) -> Result<(), DbError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let payload = encode(state).map_err(|e| DbError::Internal(e.to_string()))?;
    store.set(key, &payload).await
}

/// Result of a rehydration attempt.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    /// The record was read and decoded.
    Restored(T),
    /// No record under this key yet.
    Missing,
    /// A record exists but could not be used; the caller starts from default.
    Fallback { error: SnapshotError },
}

/// Which branch a [`LoadOutcome`] took, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Restored,
    Missing,
    Fallback,
}

impl<T> LoadOutcome<T> {
    pub fn status(&self) -> LoadStatus {
        match self {
            LoadOutcome::Restored(_) => LoadStatus::Restored,
            LoadOutcome::Missing => LoadStatus::Missing,
            LoadOutcome::Fallback { .. } => LoadStatus::Fallback,
        }
    }

    pub fn is_restored(&self) -> bool {
        matches!(self, LoadOutcome::Restored(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadOutcome::Fallback { .. })
    }
}

impl<T: Default> LoadOutcome<T> {
    /// The restored state, or the default for `Missing` and `Fallback`.
    pub fn into_state(self) -> T {
        match self {
            LoadOutcome::Restored(state) => state,
            LoadOutcome::Missing | LoadOutcome::Fallback { .. } => T::default(),
        }
    }

    /// The state to start from, plus which branch produced it.
    pub fn resolve(self) -> (T, LoadStatus) {
        let status = self.status();
        (self.into_state(), status)
    }
}

/// Like [`load`], but turns every failure into an explicit fallback.
///
/// Fallbacks are logged at `warn`.
pub async fn load_or_default<T, S>(store: &S, key: &str) -> LoadOutcome<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match load(store, key).await {
        Ok(Some(state)) => {
            debug!(key = %key, "Snapshot restored");
            LoadOutcome::Restored(state)
        }
        Ok(None) => {
            debug!(key = %key, "No snapshot, starting empty");
            LoadOutcome::Missing
        }
        Err(error) => {
            warn!(key = %key, error = %error, "Snapshot unreadable, starting from default");
            LoadOutcome::Fallback { error }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ThemeSnapshot {
        theme: String,
    }

    #[test]
    fn test_envelope_shape() {
        let json = encode(&ThemeSnapshot {
            theme: "dark".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"state":{"theme":"dark"},"version":0}"#);
    }

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let store = MemoryStore::new();
        let state = ThemeSnapshot {
            theme: "light".to_string(),
        };
        save(&store, "theme-storage", &state).await.unwrap();

        let loaded: Option<ThemeSnapshot> = load(&store, "theme-storage").await.unwrap();
        assert_eq!(loaded, Some(state));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let store = MemoryStore::new();
        let outcome: LoadOutcome<ThemeSnapshot> = load_or_default(&store, "theme-storage").await;
        assert!(matches!(outcome, LoadOutcome::Missing));
        assert_eq!(outcome.into_state(), ThemeSnapshot::default());
    }

    #[tokio::test]
    async fn test_corrupt_record_falls_back() {
        let store = MemoryStore::new();
        store.set("theme-storage", "{not json").await.unwrap();

        let outcome: LoadOutcome<ThemeSnapshot> = load_or_default(&store, "theme-storage").await;
        match &outcome {
            LoadOutcome::Fallback {
                error: SnapshotError::Deserialize { key, .. },
            } => assert_eq!(key, "theme-storage"),
            other => panic!("expected deserialize fallback, got {:?}", other),
        }
        assert_eq!(outcome.into_state(), ThemeSnapshot::default());
    }

    #[tokio::test]
    async fn test_wrong_shape_falls_back() {
        let store = MemoryStore::new();
        store
            .set("theme-storage", r#"{"state":{"theme":42},"version":0}"#)
            .await
            .unwrap();

        let outcome: LoadOutcome<ThemeSnapshot> = load_or_default(&store, "theme-storage").await;
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn test_newer_version_is_rejected() {
        let store = MemoryStore::new();
        store
            .set("theme-storage", r#"{"state":{"theme":"dark"},"version":3}"#)
            .await
            .unwrap();

        let err = load::<ThemeSnapshot, _>(&store, "theme-storage")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion { found: 3, supported: 0, .. }
        ));
    }
}
