//! Region Resolver
//!
//! Picks the region shape matching the tier of a live cache and creates, or
//! fetches, the region.

use tracing::info;

use crate::cache::{CacheRole, ClientRegionShape, GridCache, Region, RegionShape};
use crate::config::{Config, STATUS_TARGET};
use crate::error::Result;

// == Region Resolver ==
#[derive(Debug, Clone)]
pub struct RegionResolver {
    configured_role: CacheRole,
    client_shape: ClientRegionShape,
    peer_shape: RegionShape,
}

impl RegionResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            configured_role: config.role,
            client_shape: config.client_region_shape,
            peer_shape: config.peer_region_shape,
        }
    }

    /// Whether `cache` should be treated as a client. The handle's own answer
    /// wins over the configured role.
    pub fn is_client(&self, cache: &dyn GridCache) -> bool {
        cache
            .is_client_tier()
            .unwrap_or_else(|| self.configured_role.is_client())
    }

    // == New Region ==
    /// Returns the region called `name`, creating it on first use.
    pub fn new_region(&self, cache: &dyn GridCache, name: &str) -> Result<Region> {
        if self.is_client(cache) {
            info!(target: STATUS_TARGET, "CLIENT {} REGION", self.client_shape);
            cache.create_client_region(name, self.client_shape)
        } else {
            info!(target: STATUS_TARGET, "PEER {} REGION", self.peer_shape);
            cache.create_region(name, self.peer_shape)
        }
    }
}
