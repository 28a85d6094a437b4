//! API Handlers
//!
//! HTTP request handlers. Entity endpoints are generic over [`Resource`] so
//! users and passengers share one implementation of each route.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::cache::{CacheStore, MemoryCache, TagIndex};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    CacheStatsResponse, Entity, HealthResponse, InvalidateTagResponse, Passenger, StoreStats,
    User, Validate, WarmResponse,
};
use crate::repository::{MemoryDatabase, Repository};
use crate::service::{warm_all, CachedRepository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: CachedRepository<User>,
    pub passengers: CachedRepository<Passenger>,
    /// Tag index over the shared cache, for administrative invalidation
    pub tags: TagIndex,
    pub cache: Arc<dyn CacheStore>,
    pub config: Config,
}

impl AppState {
    /// Creates state over arbitrary repository and cache implementations.
    pub fn with_repositories(
        users: Arc<dyn Repository<User>>,
        passengers: Arc<dyn Repository<Passenger>>,
        cache: Arc<dyn CacheStore>,
        config: Config,
    ) -> Self {
        Self {
            users: CachedRepository::new(users, cache.clone(), config.cache_ttl),
            passengers: CachedRepository::new(passengers, cache.clone(), config.cache_ttl),
            tags: TagIndex::new(cache.clone()),
            cache,
            config,
        }
    }

    /// Creates state with both entity types backed by one database.
    pub fn new(db: Arc<MemoryDatabase>, cache: Arc<dyn CacheStore>, config: Config) -> Self {
        Self::with_repositories(db.clone(), db, cache, config)
    }

    /// Creates state with an empty in-memory database and cache.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(MemoryDatabase::new()),
            Arc::new(MemoryCache::new()),
            config.clone(),
        )
    }
}

// == Resources ==
/// An entity type exposed over HTTP.
pub trait Resource: Entity {
    fn cached(state: &AppState) -> &CachedRepository<Self>;
}

impl Resource for User {
    fn cached(state: &AppState) -> &CachedRepository<Self> {
        &state.users
    }
}

impl Resource for Passenger {
    fn cached(state: &AppState) -> &CachedRepository<Self> {
        &state.passengers
    }
}

fn check<T: Validate>(body: &T) -> Result<()> {
    match body.validate() {
        Some(message) => Err(AppError::Validation(message)),
        None => Ok(()),
    }
}

// == Entity Handlers ==

/// Handler for `GET /api/{users,passengers}`
pub async fn list_handler<E: Resource>(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(E::cached(&state).list().await?))
}

/// Handler for `GET /api/{users,passengers}/:id`
pub async fn get_handler<E: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    Ok(Json(E::cached(&state).get(id).await?))
}

/// Handler for `POST /api/{users,passengers}`
pub async fn create_handler<E>(
    State(state): State<AppState>,
    Json(draft): Json<E::Draft>,
) -> Result<(StatusCode, Json<Value>)>
where
    E: Resource,
    E::Draft: DeserializeOwned + Validate,
{
    check(&draft)?;
    let created = E::cached(&state).create(draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for `PUT`/`PATCH /api/{users,passengers}/:id`
pub async fn update_handler<E>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<E::Patch>,
) -> Result<Json<Value>>
where
    E: Resource,
    E::Patch: DeserializeOwned + Validate,
{
    check(&patch)?;
    Ok(Json(E::cached(&state).update(id, patch).await?))
}

/// Handler for `DELETE /api/{users,passengers}/:id`
pub async fn delete_handler<E: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    E::cached(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// == Cache Administration ==

/// Handler for `GET /api/cache-stats`. Read-only: the store's counters are
/// not moved by this request.
pub async fn cache_stats_handler(State(state): State<AppState>) -> Result<Json<CacheStatsResponse>> {
    let store = state.cache.stats().await.map(StoreStats::from);
    let users = state.users.collection_stats().await?;
    let passengers = state.passengers.collection_stats().await?;

    Ok(Json(CacheStatsResponse {
        cache_ttl: state.config.cache_ttl,
        users,
        passengers,
        store,
    }))
}

/// Handler for `POST /api/cache/warm`
pub async fn warm_handler(State(state): State<AppState>) -> Result<Json<WarmResponse>> {
    Ok(Json(warm_all(&state.users, &state.passengers).await?))
}

/// Handler for `DELETE /api/cache/tags/:tag`
pub async fn invalidate_tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<InvalidateTagResponse>> {
    let keys_removed = state.tags.invalidate_tag(&tag).await?;
    info!(tag = %tag, keys_removed, "Tag invalidated on request");

    Ok(Json(InvalidateTagResponse { tag, keys_removed }))
}

/// Handler for `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, UserChanges, UserType};

    fn test_state() -> AppState {
        AppState::from_config(&Config::default())
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "Ana".to_string(),
            last_name: String::new(),
            phone_number: String::new(),
            user_type: UserType::Passenger,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_handler() {
        let state = test_state();

        let (status, Json(created)) =
            create_handler::<User>(State(state.clone()), Json(new_user("ana@example.com")))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_handler::<User>(State(state), Path(1)).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_handler_rejects_invalid_body() {
        let state = test_state();

        let result = create_handler::<User>(State(state.clone()), Json(new_user("nope"))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let Json(list) = list_handler::<User>(State(state)).await.unwrap();
        assert_eq!(list, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_update_and_delete_handlers() {
        let state = test_state();
        create_handler::<User>(State(state.clone()), Json(new_user("ana@example.com")))
            .await
            .unwrap();

        let changes = UserChanges {
            user_type: Some(UserType::Admin),
            ..Default::default()
        };
        let Json(updated) = update_handler::<User>(State(state.clone()), Path(1), Json(changes))
            .await
            .unwrap();
        assert_eq!(updated["user_type"], "admin");

        let status = delete_handler::<User>(State(state.clone()), Path(1)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = get_handler::<User>(State(state), Path(1)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cache_stats_handler() {
        let state = test_state();
        create_handler::<User>(State(state.clone()), Json(new_user("ana@example.com")))
            .await
            .unwrap();

        let Json(stats) = cache_stats_handler(State(state.clone())).await.unwrap();
        assert_eq!(stats.cache_ttl, 300);
        assert!(!stats.users.cached);
        assert_eq!(stats.users.total, 1);
        assert_eq!(stats.passengers.total, 0);

        list_handler::<User>(State(state.clone())).await.unwrap();
        let Json(stats) = cache_stats_handler(State(state.clone())).await.unwrap();
        assert!(stats.users.cached);
        let store = stats.store.unwrap();

        let Json(again) = cache_stats_handler(State(state)).await.unwrap();
        let again = again.store.unwrap();
        assert_eq!((again.hits, again.misses), (store.hits, store.misses));
    }

    #[tokio::test]
    async fn test_warm_and_invalidate_handlers() {
        let state = test_state();
        for email in ["a@example.com", "b@example.com"] {
            create_handler::<User>(State(state.clone()), Json(new_user(email)))
                .await
                .unwrap();
        }

        let Json(report) = warm_handler(State(state.clone())).await.unwrap();
        assert_eq!(report.users.detail_keys, 2);

        let Json(resp) = invalidate_tag_handler(State(state.clone()), Path("users".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.keys_removed, 1);
        assert!(state.cache.get("user_list").await.unwrap().is_none());
        assert!(state.cache.get("user_1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
