//! Repository Module
//!
//! Source-of-truth CRUD for each entity type. The caching layer only ever
//! talks to a repository through this trait.

mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Entity;

pub use memory::MemoryDatabase;

/// Authoritative store for entity type `E`.
///
/// Errors are `AppError::NotFound` or `AppError::Validation` and are passed
/// through the caching layer unchanged.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Returns every entity, ordered by id.
    async fn list(&self) -> Result<Vec<E>>;

    async fn get(&self, id: i64) -> Result<E>;

    async fn create(&self, draft: E::Draft) -> Result<E>;

    /// Applies `patch` and returns the post-update entity.
    async fn update(&self, id: i64, patch: E::Patch) -> Result<E>;

    async fn delete(&self, id: i64) -> Result<()>;

    async fn count(&self) -> Result<usize>;
}
