//! In-Memory Cache Store
//!
//! HashMap storage with lazy TTL expiration, shared behind a tokio RwLock.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheStats, CacheStore, MAX_KEY_LENGTH};
use crate::error::{CacheError, CacheResult};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

// == Memory Cache ==
/// In-process cache store.
///
/// There is no background sweep: an expired entry stays in the map until the
/// next read of its key removes it.
#[derive(Debug, Default)]
pub struct MemoryCache {
    inner: RwLock<Inner>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries held, including expired ones not yet read.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

fn validate_key(key: &str) -> CacheResult<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

#[async_trait]
impl CacheStore for MemoryCache {
    // == Get ==
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        validate_key(key)?;

        // Write lock: an expired entry is dropped on the way out
        let mut inner = self.inner.write().await;
        let value = inner
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone());
        if value.is_none() {
            inner.entries.remove(key);
        }

        let count = inner.entries.len();
        inner.stats.set_total_entries(count);
        if value.is_some() {
            inner.stats.record_hit();
        } else {
            inner.stats.record_miss();
        }
        Ok(value)
    }

    // == Contains ==
    async fn contains(&self, key: &str) -> CacheResult<bool> {
        validate_key(key)?;

        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired()))
    }

    // == Set ==
    async fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> CacheResult<()> {
        validate_key(key)?;

        let mut inner = self.inner.write().await;
        inner
            .entries
            .insert(key.to_string(), CacheEntry::new(value, ttl_seconds));
        let count = inner.entries.len();
        inner.stats.set_total_entries(count);
        inner.stats.record_write();
        Ok(())
    }

    // == Delete ==
    async fn delete(&self, key: &str) -> CacheResult<bool> {
        validate_key(key)?;

        let mut inner = self.inner.write().await;
        let removed = inner.entries.remove(key).is_some();
        if removed {
            let count = inner.entries.len();
            inner.stats.set_total_entries(count);
            inner.stats.record_delete();
        }
        Ok(removed)
    }

    // == Stats ==
    async fn stats(&self) -> Option<CacheStats> {
        Some(self.inner.read().await.stats.clone())
    }
}
