//! Cache-aside reads and write-through/invalidating writes over a repository.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::cache::{keys, CacheStore, TagIndex};
use crate::error::{AppError, CacheError, CacheResult, Result};
use crate::models::{CollectionStats, Entity};
use crate::repository::Repository;
use crate::service::instrument::timed;

// == Cached Repository ==
/// Caching front for the repository of entity type `E`.
///
/// Reads check `{kind}_list` / `{kind}_{id}` first and only fall through to
/// the repository on a miss, populating the key on the way back. A hit is
/// returned as-is, so a cached copy can lag the repository by up to one TTL.
///
/// Writes always commit to the repository before touching the cache:
/// - create deletes the list key
/// - update overwrites the detail key with the new state and deletes the list key
/// - delete removes both keys
///
/// Update and delete also invalidate `E::dependent_tags(id)`.
///
/// Cache failures on a read are logged and treated as a miss. Cache failures
/// after a commit are returned to the caller; the commit stands.
///
/// Concurrent misses on one key are not coalesced: each worker queries the
/// repository and the last `set` wins. Likewise two writers to one entity can
/// finish their cache refreshes in the opposite order of their commits.
pub struct CachedRepository<E: Entity> {
    pub(super) repo: Arc<dyn Repository<E>>,
    pub(super) cache: Arc<dyn CacheStore>,
    pub(super) tags: TagIndex,
    pub(super) ttl: u64,
}

impl<E: Entity> Clone for CachedRepository<E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            cache: self.cache.clone(),
            tags: self.tags.clone(),
            ttl: self.ttl,
        }
    }
}

/// Serializes an entity or collection into its cached representation.
pub(super) fn represent<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| AppError::Cache(CacheError::from(err)))
}

/// Tags for a collection snapshot: the type tag plus every member's tags.
pub(super) fn collection_tags<E: Entity>(entities: &[E]) -> Vec<String> {
    let mut tags = BTreeSet::from([E::TAG.to_string()]);
    tags.extend(entities.iter().flat_map(|e| e.tags()));
    tags.into_iter().collect()
}

impl<E: Entity> CachedRepository<E> {
    pub fn new(repo: Arc<dyn Repository<E>>, cache: Arc<dyn CacheStore>, ttl: u64) -> Self {
        Self {
            tags: TagIndex::new(cache.clone()),
            repo,
            cache,
            ttl,
        }
    }

    /// TTL in seconds applied to every entry this repository writes
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    pub(super) fn operation(name: &str) -> String {
        format!("{}.{}", E::KIND, name)
    }

    // == Read Path ==

    /// Returns the representation of every entity.
    pub async fn list(&self) -> Result<Value> {
        timed(&Self::operation("list"), self.read_list()).await
    }

    /// Returns the representation of entity `id`.
    pub async fn get(&self, id: i64) -> Result<Value> {
        timed(&Self::operation("get"), self.read_detail(id)).await
    }

    async fn read_list(&self) -> Result<Value> {
        let key = keys::list_key::<E>();
        if let Some(cached) = self.lookup(&key).await {
            return Ok(cached);
        }

        let entities = self.repo.list().await?;
        let value = represent(&entities)?;
        self.populate(&key, &value, &collection_tags(&entities)).await;
        Ok(value)
    }

    async fn read_detail(&self, id: i64) -> Result<Value> {
        let key = keys::detail_key::<E>(id);
        if let Some(cached) = self.lookup(&key).await {
            return Ok(cached);
        }

        let entity = self.repo.get(id).await?;
        let value = represent(&entity)?;
        self.populate(&key, &value, &entity.tags()).await;
        Ok(value)
    }

    /// Cache lookup that never fails: store errors read as a miss.
    async fn lookup(&self, key: &str) -> Option<Value> {
        match self.cache.get(key).await {
            Ok(Some(value)) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(err) => {
                warn!(key, error = %err, "Cache read failed, falling back to repository");
                None
            }
        }
    }

    /// Read-path population; failures are logged and dropped.
    async fn populate(&self, key: &str, value: &Value, tags: &[String]) {
        if let Err(err) = self.store(key, value.clone(), tags).await {
            warn!(key, error = %err, "Failed to populate cache");
        }
    }

    async fn store(&self, key: &str, value: Value, tags: &[String]) -> CacheResult<()> {
        self.cache.set(key, value, self.ttl).await?;
        self.tags.tag(key, tags, self.ttl).await
    }

    // == Write Path ==

    /// Creates an entity and drops the collection snapshot.
    pub async fn create(&self, draft: E::Draft) -> Result<Value> {
        timed(&Self::operation("create"), self.write_create(draft)).await
    }

    /// Updates entity `id`, refreshing its detail key with the new state.
    pub async fn update(&self, id: i64, patch: E::Patch) -> Result<Value> {
        timed(&Self::operation("update"), self.write_update(id, patch)).await
    }

    /// Deletes entity `id` and both of its cache keys.
    pub async fn delete(&self, id: i64) -> Result<()> {
        timed(&Self::operation("delete"), self.write_delete(id)).await
    }

    async fn write_create(&self, draft: E::Draft) -> Result<Value> {
        let entity = self.repo.create(draft).await?;

        // A detail key for a brand new id cannot exist yet
        self.evict(&keys::list_key::<E>()).await?;

        info!(kind = E::KIND, id = entity.id(), "Created, collection cache invalidated");
        represent(&entity)
    }

    async fn write_update(&self, id: i64, patch: E::Patch) -> Result<Value> {
        let entity = self.repo.update(id, patch).await?;
        let value = represent(&entity)?;

        let detail = keys::detail_key::<E>(id);
        self.store(&detail, value.clone(), &entity.tags())
            .await
            .map_err(|err| Self::write_failure(&detail, err))?;
        self.evict(&keys::list_key::<E>()).await?;
        self.invalidate_dependents(id).await?;

        info!(kind = E::KIND, id, "Updated, detail cache refreshed");
        Ok(value)
    }

    async fn write_delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await?;

        self.evict(&keys::detail_key::<E>(id)).await?;
        self.evict(&keys::list_key::<E>()).await?;
        self.invalidate_dependents(id).await?;

        info!(kind = E::KIND, id, "Deleted, cache entries removed");
        Ok(())
    }

    async fn evict(&self, key: &str) -> Result<()> {
        self.cache
            .delete(key)
            .await
            .map(|_| ())
            .map_err(|err| Self::write_failure(key, err))
    }

    async fn invalidate_dependents(&self, id: i64) -> Result<()> {
        for tag in E::dependent_tags(id) {
            self.tags
                .invalidate_tag(&tag)
                .await
                .map_err(|err| Self::write_failure(&tag, err))?;
        }
        Ok(())
    }

    fn write_failure(key: &str, err: CacheError) -> AppError {
        error!(key, error = %err, "Cache update failed after commit, repository change kept");
        AppError::Cache(err)
    }

    // == Stats ==

    /// Reports whether the collection key is live and how many entities exist.
    ///
    /// Leaves the store untouched: the key check is neither counted as a hit
    /// or miss nor evicts an expired snapshot.
    pub async fn collection_stats(&self) -> Result<CollectionStats> {
        let cache_key = keys::list_key::<E>();
        let cached = match self.cache.contains(&cache_key).await {
            Ok(cached) => cached,
            Err(err) => {
                warn!(key = %cache_key, error = %err, "Cache check failed, reporting as not cached");
                false
            }
        };
        let total = self.repo.count().await?;

        Ok(CollectionStats {
            cache_key,
            cached,
            total,
        })
    }
}
