//! Entities and request/response models
//!
//! Entities are the cached representations; the DTOs shape HTTP bodies.

pub mod entities;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use entities::{Entity, Passenger, User, UserType};
pub use requests::{NewPassenger, NewUser, PassengerChanges, UserChanges, Validate};
pub use responses::{
    CacheStatsResponse, CollectionStats, ErrorResponse, HealthResponse, InvalidateTagResponse,
    StoreStats, WarmCount, WarmResponse,
};
