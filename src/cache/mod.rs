//! Cache Module
//!
//! The cache store seam, an in-memory implementation with lazy TTL expiry,
//! key naming, and the tag index used for bulk invalidation.

mod entry;
pub mod keys;
mod memory;
mod stats;
mod tags;


use async_trait::async_trait;
use serde_json::Value;

use crate::error::CacheResult;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use stats::CacheStats;
pub use tags::TagIndex;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

// == Cache Store ==
/// A TTL-capable key-value cache shared by every request.
///
/// Each call is a single atomic primitive; callers compose them without any
/// cross-call locking. An entry whose TTL has elapsed is indistinguishable
/// from one that was never set.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the live value under `key`, or `None`.
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Reports whether a live entry exists under `key` without counting the
    /// lookup or dropping an expired entry.
    async fn contains(&self, key: &str) -> CacheResult<bool>;

    /// Stores `value` under `key` for `ttl_seconds`, overwriting any previous entry.
    async fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> CacheResult<()>;

    /// Removes `key`. Returns whether an entry was present.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Activity counters, for stores that keep them.
    async fn stats(&self) -> Option<CacheStats> {
        None
    }
}
