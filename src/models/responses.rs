//! Response DTOs for the caching service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Cache status of one entity collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    /// Collection cache key, e.g. `user_list`
    pub cache_key: String,
    /// Whether the collection key currently holds a live entry
    pub cached: bool,
    /// Number of entities in the repository
    pub total: usize,
}

/// Response body for `GET /api/cache-stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Configured TTL in seconds
    pub cache_ttl: u64,
    pub users: CollectionStats,
    pub passengers: CollectionStats,
    /// Store counters, when the store keeps them
    pub store: Option<StoreStats>,
}

/// Store counters plus derived hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub deletes: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl From<CacheStats> for StoreStats {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            deletes: stats.deletes,
            total_entries: stats.total_entries,
        }
    }
}

/// Keys written by one warm-up of an entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarmCount {
    /// Collection keys populated (1 per run)
    pub list_keys: usize,
    /// Detail keys populated, one per entity
    pub detail_keys: usize,
}

/// Response body for `POST /api/cache/warm`
#[derive(Debug, Clone, Serialize)]
pub struct WarmResponse {
    pub message: String,
    pub users: WarmCount,
    pub passengers: WarmCount,
}

impl WarmResponse {
    pub fn new(users: WarmCount, passengers: WarmCount) -> Self {
        Self {
            message: "Cache warm-up complete".to_string(),
            users,
            passengers,
        }
    }
}

/// Response body for `DELETE /api/cache/tags/:tag`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateTagResponse {
    pub tag: String,
    /// Number of cache keys deleted
    pub keys_removed: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
