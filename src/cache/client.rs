//! Client Cache Module
//!
//! Client-tier cache. Its regions live in this process's memory only.

use tracing::info;

use crate::cache::{
    validate_properties, ClientRegionShape, GridCache, Region, RegionRegistry, RegionShape, Shape,
};
use crate::error::{GridError, Result};
use crate::properties::{Configuration, NAME};

// == Client Cache ==
#[derive(Debug)]
pub struct ClientCache {
    member_name: String,
    properties: Configuration,
    regions: RegionRegistry,
}

impl ClientCache {
    /// Creates a client cache from `properties`.
    ///
    /// # Arguments
    /// * `properties` - Frozen cache properties
    /// * `lru_max_entries` - Entry limit for `LOCAL_HEAP_LRU` regions
    pub fn new(properties: Configuration, lru_max_entries: usize) -> Result<Self> {
        validate_properties(&properties)?;

        let member_name = properties.get(NAME).unwrap_or_default().to_string();
        info!("Client cache [{}] created", member_name);

        Ok(Self {
            member_name,
            properties,
            regions: RegionRegistry::new(lru_max_entries),
        })
    }
}

impl GridCache for ClientCache {
    fn member_name(&self) -> &str {
        &self.member_name
    }

    fn properties(&self) -> &Configuration {
        &self.properties
    }

    fn is_client_tier(&self) -> Option<bool> {
        Some(true)
    }

    fn create_client_region(&self, name: &str, shape: ClientRegionShape) -> Result<Region> {
        self.regions.get_or_create(name, Shape::Client(shape))
    }

    fn create_region(&self, name: &str, shape: RegionShape) -> Result<Region> {
        Err(GridError::UnsupportedOperation(format!(
            "a client cache cannot create {} region [{}]",
            shape, name
        )))
    }

    fn region(&self, name: &str) -> Option<Region> {
        self.regions.get(name)
    }

    fn regions(&self) -> Vec<Region> {
        self.regions.list()
    }
}
