//! API Module
//!
//! HTTP handlers and routing for the users/passengers API and cache administration.
//!
//! # Endpoints
//! - `/api/users`, `/api/users/:id` - Cached user CRUD
//! - `/api/passengers`, `/api/passengers/:id` - Cached passenger CRUD
//! - `GET /api/cache-stats` - Cache status report
//! - `POST /api/cache/warm` - Cache warm-up
//! - `DELETE /api/cache/tags/:tag` - Tag invalidation
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
