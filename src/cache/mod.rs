//! Cache Module
//!
//! The in-process grid: cache handles for the client and peer tiers, regions
//! and their shapes.

mod client;
mod key;
mod lru;
mod peer;
mod region;
mod role;
mod shape;
mod stats;


use std::fmt::Debug;
use std::sync::Arc;

// Re-export public types
pub use client::ClientCache;
pub use key::Key;
pub use lru::LruTracker;
pub use peer::PeerCache;
pub use region::{Region, RegionRegistry};
pub use role::CacheRole;
pub use shape::{ClientRegionShape, Layout, RegionShape, Shape};
pub use stats::RegionStats;

use crate::error::{GridError, Result};
use crate::properties::{Configuration, LOCATORS, LOG_LEVEL};
use crate::server::CacheServer;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Buckets a partitioned region spreads its entries over
pub const DEFAULT_TOTAL_BUCKETS: usize = 113;

/// Log levels a cache accepts in its `log-level` property
pub const LOG_LEVELS: [&str; 10] = [
    "all", "finest", "finer", "fine", "config", "info", "warning", "error", "severe", "none",
];

// == Grid Cache ==
/// Operations every cache handle exposes, whichever tier it belongs to.
pub trait GridCache: Send + Sync + Debug {
    /// Member name from the `name` property.
    fn member_name(&self) -> &str;

    /// Properties the cache was created from.
    fn properties(&self) -> &Configuration;

    /// Whether this handle belongs to the client tier. `None` means the handle
    /// cannot tell, and callers fall back to the configured role.
    fn is_client_tier(&self) -> Option<bool> {
        None
    }

    /// Creates, or returns the existing, client region called `name`.
    fn create_client_region(&self, name: &str, shape: ClientRegionShape) -> Result<Region>;

    /// Creates, or returns the existing, peer region called `name`.
    fn create_region(&self, name: &str, shape: RegionShape) -> Result<Region>;

    fn region(&self, name: &str) -> Option<Region>;

    fn regions(&self) -> Vec<Region>;

    /// Cache servers attached to this cache.
    fn cache_servers(&self) -> Vec<CacheServer> {
        Vec::new()
    }
}

/// Shared handle to the live cache of this process.
pub type CacheHandle = Arc<dyn GridCache>;

// == Property Validation ==
/// Checks the properties a cache is about to be created from.
pub(crate) fn validate_properties(properties: &Configuration) -> Result<()> {
    if let Some(level) = properties.get(LOG_LEVEL) {
        if !LOG_LEVELS.contains(&level.trim().to_ascii_lowercase().as_str()) {
            return Err(GridError::Configuration {
                name: LOG_LEVEL.to_string(),
                value: level.to_string(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            });
        }
    }

    if let Some(locators) = properties.get(LOCATORS) {
        for locator in locators.split(',') {
            parse_locator(locator).ok_or_else(|| GridError::Configuration {
                name: LOCATORS.to_string(),
                value: locators.to_string(),
                reason: "expected host[port]".to_string(),
            })?;
        }
    }

    Ok(())
}

/// Splits `host[port]` into its parts.
pub fn parse_locator(locator: &str) -> Option<(&str, u16)> {
    let locator = locator.trim();
    let open = locator.find('[')?;
    let host = &locator[..open];
    let port = locator[open + 1..].strip_suffix(']')?.parse().ok()?;
    if host.is_empty() {
        return None;
    }
    Some((host, port))
}
