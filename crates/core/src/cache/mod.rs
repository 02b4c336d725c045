//! Local cache store: last-known-good entity lists in on-device key-value
//! storage.
//!
//! The store is best-effort. A `put_list` replaces the namespace wholesale
//! (last-writer-wins, no merge); the single-item operations read-modify-write
//! the existing list and initialize an empty one when absent. No mutual
//! exclusion is layered on top of the substrate's per-call atomicity, so two
//! racing read-modify-writes can lose an update. Accepted for the single-user,
//! mostly-sequential usage pattern.

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::{Error, Result};

/// Cache namespace for a user's trip list.
pub fn trips_namespace(user_id: &str) -> String {
    format!("tripsByUser:{}", user_id)
}

/// Cache namespace for a trip's itinerary days.
pub fn itinerary_namespace(trip_id: &str) -> String {
    format!("itineraryByTrip:{}", trip_id)
}

/// Async string key-value substrate (device storage, file, memory).
///
/// Implementations provide per-call atomicity only; callers must not assume
/// any cross-call ordering or exclusion.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory substrate for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Namespaced serialized-list cache over a [`KeyValueStorage`] substrate.
#[derive(Clone)]
pub struct CacheStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CacheStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the cached list, if any.
    pub async fn get_list<T: DeserializeOwned>(&self, namespace: &str) -> Result<Option<Vec<T>>> {
        let Some(raw) = self.storage.get(namespace).await? else {
            return Ok(None);
        };
        let list = serde_json::from_str(&raw)
            .map_err(|e| Error::cache(format!("corrupt entry under {}: {}", namespace, e)))?;
        Ok(Some(list))
    }

    /// Replace the namespace's contents wholesale.
    pub async fn put_list<T: Serialize>(&self, namespace: &str, list: &[T]) -> Result<()> {
        let raw = serde_json::to_string(list)?;
        self.storage.set(namespace, &raw).await
    }

    /// Append one entity to the cached list.
    pub async fn append_one<T>(&self, namespace: &str, entity: &T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut list = self.load_or_empty::<T>(namespace).await?;
        list.push(serde_json::from_value(serde_json::to_value(entity)?)?);
        self.put_list(namespace, &list).await
    }

    /// Replace the entity with the given id. A miss is a no-op; the cache is
    /// never the source of truth, so there is nothing to reconcile.
    pub async fn replace_one<T>(&self, namespace: &str, id: &str, entity: &T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut list: Vec<serde_json::Value> = self
            .get_list(namespace)
            .await?
            .unwrap_or_default();
        let replacement = serde_json::to_value(entity)?;
        match list.iter_mut().find(|item| item_id(item) == Some(id)) {
            Some(slot) => *slot = replacement,
            None => {
                debug!("replace_one: {} absent under {}, skipping", id, namespace);
                return Ok(());
            }
        }
        self.put_list(namespace, &list).await
    }

    /// Remove the entity with the given id, if present.
    pub async fn remove_one(&self, namespace: &str, id: &str) -> Result<()> {
        let mut list: Vec<serde_json::Value> = self
            .get_list(namespace)
            .await?
            .unwrap_or_default();
        list.retain(|item| item_id(item) != Some(id));
        self.put_list(namespace, &list).await
    }

    /// Evict a whole namespace.
    pub async fn remove_namespace(&self, namespace: &str) -> Result<()> {
        self.storage.remove(namespace).await
    }

    async fn load_or_empty<T: DeserializeOwned>(&self, namespace: &str) -> Result<Vec<T>> {
        Ok(self.get_list(namespace).await?.unwrap_or_default())
    }
}

fn item_id(item: &serde_json::Value) -> Option<&str> {
    item.get("id").and_then(|v| v.as_str())
}
