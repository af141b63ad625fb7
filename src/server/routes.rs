//! Cache Server Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_entry_handler, health_handler, list_regions_handler, put_entry_handler,
    region_stats_handler, remove_entry_handler, AppState,
};

/// Creates the cache server router.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /regions` - List regions of the serving cache
/// - `GET /regions/:region/stats` - Region statistics
/// - `GET /regions/:region/entries/:key` - Read an entry
/// - `PUT /regions/:region/entries/:key` - Write an entry
/// - `DELETE /regions/:region/entries/:key` - Remove an entry
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/regions", get(list_regions_handler))
        .route("/regions/:region/stats", get(region_stats_handler))
        .route(
            "/regions/:region/entries/:key",
            put(put_entry_handler)
                .get(get_entry_handler)
                .delete(remove_entry_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
