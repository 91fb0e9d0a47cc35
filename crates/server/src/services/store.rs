// Collection store: typed JSON blobs over a key-value backend

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{db::models::SessionUser, error::Result, services::seed};

use super::kv::KvBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Projects,
    Tickets,
    Comments,
    WebsiteAnalytics,
    SocialAnalytics,
    StageHistory,
    Activities,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Users,
        Collection::Projects,
        Collection::Tickets,
        Collection::Comments,
        Collection::WebsiteAnalytics,
        Collection::SocialAnalytics,
        Collection::StageHistory,
        Collection::Activities,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Projects => "projects",
            Collection::Tickets => "tickets",
            Collection::Comments => "comments",
            Collection::WebsiteAnalytics => "website_analytics",
            Collection::SocialAnalytics => "social_analytics",
            Collection::StageHistory => "stage_history",
            Collection::Activities => "activities",
        }
    }
}

const SESSION_SUFFIX: &str = "current_user";

#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KvBackend>,
    namespace: String,
}

impl Store {
    pub fn new(backend: Arc<dyn KvBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn key(&self, collection: Collection) -> String {
        format!("{}_{}", self.namespace, collection.suffix())
    }

    pub fn session_key(&self) -> String {
        format!("{}_{SESSION_SUFFIX}", self.namespace)
    }

    /// Reads `collection`, falling back to `seed` when the key is absent or
    /// holds something that does not parse.
    pub async fn load<T, F>(&self, collection: Collection, seed: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        self.load_key(&self.key(collection), seed).await
    }

    pub async fn save<T>(&self, collection: Collection, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.save_key(&self.key(collection), value).await
    }

    async fn load_key<T, F>(&self, key: &str, seed: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(seed());
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value failed to parse, using seed data");
                Ok(seed())
            }
        }
    }

    async fn save_key<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw).await
    }

    /// Starts a set of collection writes that land together or not at all.
    pub fn batch(&self) -> WriteBatch<'_> {
        WriteBatch {
            store: self,
            entries: Vec::new(),
        }
    }

    /// Writes every seed collection, replacing whatever was stored.
    pub async fn initialize(&self) -> Result<()> {
        let mut batch = self.batch();
        batch.put(Collection::Users, &seed::users())?;
        batch.put(Collection::Projects, &seed::projects())?;
        batch.put(Collection::Tickets, &seed::tickets())?;
        batch.put(Collection::Comments, &seed::comments())?;
        batch.put(Collection::WebsiteAnalytics, &seed::website_analytics())?;
        batch.put(Collection::SocialAnalytics, &seed::social_analytics())?;
        batch.put(Collection::StageHistory, &seed::stage_history())?;
        batch.put(Collection::Activities, &seed::activities())?;
        batch.commit().await?;

        tracing::info!(namespace = %self.namespace, "store initialized with seed data");
        Ok(())
    }

    /// Removes every collection key and the session.
    pub async fn clear(&self) -> Result<()> {
        for collection in Collection::ALL {
            self.backend.remove(&self.key(collection)).await?;
        }
        self.clear_session().await?;

        tracing::info!(namespace = %self.namespace, "store cleared");
        Ok(())
    }

    pub async fn session(&self) -> Result<Option<SessionUser>> {
        self.load_key(&self.session_key(), || None).await
    }

    pub async fn set_session(&self, user: &SessionUser) -> Result<()> {
        self.save_key(&self.session_key(), user).await
    }

    pub async fn clear_session(&self) -> Result<()> {
        self.backend.remove(&self.session_key()).await
    }

    /// Raw stored text for a collection, if any.
    pub async fn raw(&self, collection: Collection) -> Result<Option<String>> {
        self.backend.get(&self.key(collection)).await
    }
}

/// Serialized collection values waiting to be written in one backend call.
pub struct WriteBatch<'a> {
    store: &'a Store,
    entries: Vec<(String, String)>,
}

impl WriteBatch<'_> {
    pub fn put<T>(&mut self, collection: Collection, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = self.store.key(collection);
        let raw = serde_json::to_string(value)?;
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, raw));
        Ok(())
    }

    pub async fn commit(self) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        self.store.backend.set_many(&self.entries).await
    }
}
