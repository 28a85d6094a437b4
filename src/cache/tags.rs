//! Tag Index
//!
//! Groups cache keys under logical tags so they can be invalidated together.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{keys, CacheStore};
use crate::error::CacheResult;

// == Tag Index ==
/// Maps a tag name to the set of cache keys tagged with it.
///
/// Member sets live in the same cache store as the entries they point at,
/// under `tag:{name}`, as sorted JSON arrays. A tag set takes the TTL of the
/// last entry tagged into it; it has no lifecycle of its own.
///
/// Known race: `tag` is a read-modify-write of the whole set with nothing
/// held between the read and the write. Two workers tagging into the same tag
/// at once can each write back a set missing the other's key, and the last
/// write wins. A key lost this way is simply not removed by a later
/// `invalidate_tag` and lives until its own TTL.
#[derive(Clone)]
pub struct TagIndex {
    cache: Arc<dyn CacheStore>,
}

impl TagIndex {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }

    // == Members ==
    /// Returns the keys currently recorded under `tag`. Absent tag → empty set.
    pub async fn members(&self, tag: &str) -> CacheResult<BTreeSet<String>> {
        match self.cache.get(&keys::tag_key(tag)).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(BTreeSet::new()),
        }
    }

    // == Tag ==
    /// Adds `key` to the member set of every tag in `tags`, storing each set
    /// back with `ttl_seconds`.
    pub async fn tag(&self, key: &str, tags: &[String], ttl_seconds: u64) -> CacheResult<()> {
        let added = BTreeSet::from([key.to_string()]);
        for tag in tags {
            self.tag_keys(tag, &added, ttl_seconds).await?;
        }
        Ok(())
    }

    /// Adds every key in `added` to the member set of `tag` with a single
    /// read-modify-write. Same race as `tag`.
    pub async fn tag_keys(
        &self,
        tag: &str,
        added: &BTreeSet<String>,
        ttl_seconds: u64,
    ) -> CacheResult<()> {
        if added.is_empty() {
            return Ok(());
        }

        let mut members = self.members(tag).await?;
        members.extend(added.iter().cloned());
        self.cache
            .set(&keys::tag_key(tag), serde_json::to_value(&members)?, ttl_seconds)
            .await
    }

    // == Invalidate Tag ==
    /// Deletes every key recorded under `tag`, then the tag itself.
    ///
    /// Returns how many member keys were deleted. A tag with no recorded keys
    /// is left alone.
    pub async fn invalidate_tag(&self, tag: &str) -> CacheResult<usize> {
        let members = self.members(tag).await?;
        if members.is_empty() {
            return Ok(0);
        }

        for key in &members {
            self.cache.delete(key).await?;
        }
        self.cache.delete(&keys::tag_key(tag)).await?;

        debug!(tag, keys = members.len(), "Invalidated tag");
        Ok(members.len())
    }
}
