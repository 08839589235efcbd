//! In-memory cache store for tests and single-process runs.

use super::{CacheError, CacheResult, CacheStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Thread-safe in-memory cache store with per-entry expiry.
///
/// Expired entries are treated as absent on read and are dropped lazily.
/// Prefix deletion removes matches in one pass under the write lock, so
/// there is no paging here.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

impl InMemoryCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] if the internal lock is poisoned.
    pub fn len(&self) -> CacheResult<usize> {
        let entries = self.entries.read().map_err(poisoned)?;
        let now = Instant::now();
        Ok(entries.values().filter(|entry| entry.is_live(now)).count())
    }

    /// Returns `true` when the store holds no live entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] if the internal lock is poisoned.
    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns every live key, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] if the internal lock is poisoned.
    pub fn keys(&self) -> CacheResult<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        let now = Instant::now();
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> CacheError {
    CacheError::Backend(format!("cache lock poisoned: {err}"))
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(poisoned)?;
        let value = match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        };
        drop(entries);

        if value.is_some() {
            debug!(key, "cache hit");
        } else {
            debug!(key, "cache miss");
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let expires_at = Instant::now() + ttl;
        self.entries.write().map_err(poisoned)?.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at,
            },
        );
        debug!(key, ttl_millis = ttl.as_millis(), "cache set");
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(poisoned)?;
        let mut deleted: u64 = 0;
        for key in keys {
            if entries.remove(key).is_some_and(|entry| entry.is_live(now)) {
                deleted += 1;
            }
        }
        drop(entries);

        debug!(requested = keys.len(), deleted, "cache delete");
        Ok(deleted)
    }

    async fn delete_by_prefix(&self, prefix: &str) -> CacheResult<u64> {
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(poisoned)?;
        let mut deleted: u64 = 0;
        entries.retain(|key, entry| {
            if !key.starts_with(prefix) {
                return true;
            }
            if entry.is_live(now) {
                deleted += 1;
            }
            false
        });
        drop(entries);

        debug!(prefix, deleted, "cache prefix delete");
        Ok(deleted)
    }

    async fn health_check(&self) -> CacheResult<()> {
        self.entries.read().map_err(poisoned).map(|_| ())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
