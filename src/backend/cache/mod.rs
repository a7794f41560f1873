//! Best-Effort Cache
//!
//! A key-value store behind the `CacheStore` trait plus two helpers that
//! never let a store failure reach the request:
//!
//! - `cache_set` drops the value if the store is unavailable
//! - `cache_get_or_set` recomputes the value if the store is unavailable
//!
//! Values are stored as JSON strings. Absent values (`None`) are never
//! cached, so a lookup for a missing row is always recomputed.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Cache store errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache backend timed out")]
    Timeout,
}

/// A key-value store with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Process-local store, the default backend
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|_, (_, expires_at)| *expires_at > now);
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Unavailable(format!("timeout {:?} out of range", ttl)))?;
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }
}

/// Store a value, ignoring store failures
pub async fn cache_set<T: Serialize>(store: &dyn CacheStore, key: &str, value: &T, ttl: Duration) {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!("Failed to encode cache entry {}: {}", key, e);
            return;
        }
    };
    if let Err(e) = store.set(key, encoded, ttl).await {
        tracing::debug!("Cache set skipped for {}: {}", key, e);
    }
}

/// Remove a value, ignoring store failures
pub async fn cache_delete(store: &dyn CacheStore, key: &str) {
    if let Err(e) = store.delete(key).await {
        tracing::debug!("Cache delete skipped for {}: {}", key, e);
    }
}

/// Read a value through the cache
///
/// On a miss, `compute` runs and a `Some` result is stored for `ttl`.
/// If the store fails (or holds an entry that no longer decodes) the value
/// is recomputed as if the cache did not exist. Errors from `compute`
/// itself are returned unchanged.
pub async fn cache_get_or_set<T, E, F, Fut>(
    store: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<Option<T>, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    match store.get(key).await {
        Ok(Some(cached)) => match serde_json::from_str(&cached) {
            Ok(value) => {
                tracing::debug!("Cache hit for {}", key);
                return Ok(Some(value));
            }
            Err(e) => tracing::warn!("Discarding undecodable cache entry {}: {}", key, e),
        },
        Ok(None) => {}
        Err(e) => {
            tracing::debug!("Cache unavailable for {}, recomputing: {}", key, e);
            return compute().await;
        }
    }

    let value = compute().await?;
    if let Some(value) = &value {
        cache_set(store, key, value, ttl).await;
    }
    Ok(value)
}
