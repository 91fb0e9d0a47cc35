// Key-value backends for the collection store

#[cfg(test)]
use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
#[cfg(test)]
use tokio::sync::RwLock;

use crate::{db::Database, error::Result};

/// Raw string storage keyed by name. Values are opaque to the backend.
#[async_trait]
pub trait KvBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;

    /// Writes every entry or none of them.
    async fn set_many(&self, entries: &[(String, String)]) -> Result<()>;
}

const UPSERT: &str = r#"
    INSERT INTO kv_entries (key, value, updated_at) VALUES (?, ?, ?)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
"#;

/// Backend persisting every key as a row of `kv_entries`.
pub struct SqliteKv {
    db: Database,
}

impl SqliteKv {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KvBackend for SqliteKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.db.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.db.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?")
            .bind(key)
            .execute(&self.db.pool)
            .await?;
        Ok(())
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(UPSERT)
                .bind(key)
                .bind(value)
                .bind(now.as_str())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

/// In-process backend; contents vanish with the process.
#[cfg(test)]
#[derive(Default, Clone)]
pub struct MemoryKv {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[async_trait]
impl KvBackend for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
        let mut map = self.entries.write().await;
        for (key, value) in entries {
            map.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}
