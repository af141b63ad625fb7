//! Cache Server Module
//!
//! Client-facing HTTP listener of a server-side cache.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /regions` - List regions
//! - `GET /regions/:region/stats` - Region statistics
//! - `GET|PUT|DELETE /regions/:region/entries/:key` - Entry access

mod cache_server;
pub mod handlers;
pub mod routes;

pub use cache_server::CacheServer;
pub use handlers::AppState;
pub use routes::create_router;
