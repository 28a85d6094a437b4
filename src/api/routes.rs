//! API Routes
//!
//! Configures the Axum router with the entity and cache administration endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, create_handler, delete_handler, get_handler, health_handler,
    invalidate_tag_handler, list_handler, update_handler, warm_handler, AppState,
};
use crate::models::{Passenger, User};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET|POST /api/users`, `GET|PUT|PATCH|DELETE /api/users/:id`
/// - `GET|POST /api/passengers`, `GET|PUT|PATCH|DELETE /api/passengers/:id`
/// - `GET /api/cache-stats` - Collection cache status and store counters
/// - `POST /api/cache/warm` - Populate the cache from the repositories
/// - `DELETE /api/cache/tags/:tag` - Invalidate every key under a tag
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/users",
            get(list_handler::<User>).post(create_handler::<User>),
        )
        .route(
            "/api/users/:id",
            get(get_handler::<User>)
                .put(update_handler::<User>)
                .patch(update_handler::<User>)
                .delete(delete_handler::<User>),
        )
        .route(
            "/api/passengers",
            get(list_handler::<Passenger>).post(create_handler::<Passenger>),
        )
        .route(
            "/api/passengers/:id",
            get(get_handler::<Passenger>)
                .put(update_handler::<Passenger>)
                .patch(update_handler::<Passenger>)
                .delete(delete_handler::<Passenger>),
        )
        .route("/api/cache-stats", get(cache_stats_handler))
        .route("/api/cache/warm", post(warm_handler))
        .route("/api/cache/tags/:tag", delete(invalidate_tag_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
