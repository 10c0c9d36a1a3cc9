//! `KeyValueStore` over the `kv_store` table.

use chrono::Utc;
use tracing::debug;

use super::KeyValueStore;
use crate::error::DbResult;
use crate::pool::SqliteStore;

impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        debug!(key = %key, bytes = value.len(), "Writing snapshot row");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(self.pool())
            .await?;

        Ok(keys)
    }
}
