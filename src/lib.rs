//! Passenger Cache - cache-aside and write-through caching for a users/passengers API
//!
//! Reads are served from a TTL cache and populated from the repository on a
//! miss; writes commit to the repository first, then refresh or invalidate
//! the affected cache keys.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use api::AppState;
pub use config::Config;
