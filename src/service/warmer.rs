//! Cache warm-up: bulk population from the repository.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::cache::keys;
use crate::error::Result;
use crate::models::{Entity, Passenger, User, WarmCount, WarmResponse};
use crate::service::cached::{collection_tags, represent, CachedRepository};
use crate::service::instrument::timed;

impl<E: Entity> CachedRepository<E> {
    /// Loads every entity and writes the collection key plus one detail key
    /// per entity, overwriting whatever is cached.
    ///
    /// Stops at the first cache failure; keys written before it stay cached.
    pub async fn warm(&self) -> Result<WarmCount> {
        timed(&Self::operation("warm"), self.populate_all()).await
    }

    // Values are written first, then each tag set once with every key
    // gathered for it.
    async fn populate_all(&self) -> Result<WarmCount> {
        let entities = self.repo.list().await?;
        let mut tagged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        let list_key = keys::list_key::<E>();
        self.cache.set(&list_key, represent(&entities)?, self.ttl).await?;
        for tag in collection_tags(&entities) {
            tagged.entry(tag).or_default().insert(list_key.clone());
        }
        info!(key = %list_key, entities = entities.len(), "Cached collection");

        let mut detail_keys = 0;
        for entity in &entities {
            let key = keys::detail_key::<E>(entity.id());
            self.cache.set(&key, represent(entity)?, self.ttl).await?;
            for tag in entity.tags() {
                tagged.entry(tag).or_default().insert(key.clone());
            }
            detail_keys += 1;
        }
        info!(kind = E::KIND, detail_keys, "Cached individual entities");

        for (tag, members) in &tagged {
            self.tags.tag_keys(tag, members, self.ttl).await?;
        }

        Ok(WarmCount {
            list_keys: 1,
            detail_keys,
        })
    }
}

/// Warms every entity type, users first.
pub async fn warm_all(
    users: &CachedRepository<User>,
    passengers: &CachedRepository<Passenger>,
) -> Result<WarmResponse> {
    info!("Starting cache warm-up");
    let users = users.warm().await?;
    let passengers = passengers.warm().await?;
    info!(
        users = users.detail_keys,
        passengers = passengers.detail_keys,
        "Cache warm-up complete"
    );
    Ok(WarmResponse::new(users, passengers))
}
