//! In-process `KeyValueStore`.
//!
//! Clones share the same map, so a test can hand one clone to a store,
//! drop that store, and rehydrate a fresh one from another clone to model
//! an app restart.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::error::DbResult;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> DbResult<Vec<String>> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("b", "2").await.unwrap();
        store.set("a", "1").await.unwrap();

        assert_eq!(other.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(other.keys().await.unwrap(), ["a", "b"]);

        other.remove("a").await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
