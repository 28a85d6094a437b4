//! Test doubles for the repository and cache store seams.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::{CacheStats, CacheStore, MemoryCache};
use crate::error::{CacheError, CacheResult, Result};
use crate::models::{Entity, NewPassenger, NewUser, UserType};
use crate::repository::Repository;

// == Counting Repository ==
/// Wraps a repository and counts the reads that reach it.
pub struct CountingRepository<E: Entity> {
    inner: Arc<dyn Repository<E>>,
    reads: AtomicUsize,
}

impl<E: Entity> CountingRepository<E> {
    pub fn new(inner: Arc<dyn Repository<E>>) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of `list`/`get` calls so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for CountingRepository<E> {
    async fn list(&self) -> Result<Vec<E>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.list().await
    }

    async fn get(&self, id: i64) -> Result<E> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn create(&self, draft: E::Draft) -> Result<E> {
        self.inner.create(draft).await
    }

    async fn update(&self, id: i64, patch: E::Patch) -> Result<E> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.inner.delete(id).await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}

// == Flaky Cache ==
/// In-memory store whose reads and writes can be switched to fail.
#[derive(Default)]
pub struct FlakyCache {
    inner: MemoryCache,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reads straight from the backing store, ignoring the failure switches.
    pub async fn peek(&self, key: &str) -> Option<Value> {
        self.inner.get(key).await.ok().flatten()
    }

    fn check(&self, flag: &AtomicBool) -> CacheResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(CacheError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheStore for FlakyCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        self.check(&self.fail_reads)?;
        self.inner.get(key).await
    }

    async fn contains(&self, key: &str) -> CacheResult<bool> {
        self.check(&self.fail_reads)?;
        self.inner.contains(key).await
    }

    async fn set(&self, key: &str, value: Value, ttl_seconds: u64) -> CacheResult<()> {
        self.check(&self.fail_writes)?;
        self.inner.set(key, value, ttl_seconds).await
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        self.check(&self.fail_writes)?;
        self.inner.delete(key).await
    }

    async fn stats(&self) -> Option<CacheStats> {
        self.inner.stats().await
    }
}

// == Builders ==
pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        phone_number: "555-0100".to_string(),
        user_type: UserType::Passenger,
    }
}

pub fn new_passenger(user: i64, passenger_id: &str) -> NewPassenger {
    NewPassenger {
        user,
        passenger_id: passenger_id.to_string(),
        preferred_payment_method: "card".to_string(),
        home_address: "1 Main St".to_string(),
    }
}
