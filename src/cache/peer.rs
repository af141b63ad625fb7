//! Peer Cache Module
//!
//! Cluster-member cache. Regions are created with peer shapes and served to
//! clients through attached cache servers.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::cache::{
    validate_properties, ClientRegionShape, GridCache, Region, RegionRegistry, RegionShape, Shape,
};
use crate::error::{GridError, Result};
use crate::properties::{Configuration, LOCATORS, NAME, START_LOCATOR};
use crate::server::CacheServer;

// == Peer Cache ==
#[derive(Debug)]
pub struct PeerCache {
    member_name: String,
    properties: Configuration,
    regions: Arc<RegionRegistry>,
    servers: Mutex<Vec<CacheServer>>,
}

impl PeerCache {
    /// Creates a peer cache from `properties`.
    pub fn new(properties: Configuration, lru_max_entries: usize) -> Result<Self> {
        validate_properties(&properties)?;

        let member_name = properties.get(NAME).unwrap_or_default().to_string();
        info!("Peer cache [{}] created", member_name);
        if let Some(locators) = properties.get(LOCATORS) {
            info!("Member [{}] configured with locators {}", member_name, locators);
        }
        if let Some(locator) = properties.get(START_LOCATOR) {
            info!("Member [{}] configured to start locator {}", member_name, locator);
        }

        Ok(Self {
            member_name,
            properties,
            regions: Arc::new(RegionRegistry::new(lru_max_entries)),
            servers: Mutex::new(Vec::new()),
        })
    }

    // == Add Cache Server ==
    /// Attaches a new, not yet started, cache server serving this cache's
    /// regions.
    pub fn add_cache_server(&self) -> CacheServer {
        let server = CacheServer::new(self.member_name.clone(), self.regions.clone());
        self.servers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(server.clone());
        server
    }
}

impl GridCache for PeerCache {
    fn member_name(&self) -> &str {
        &self.member_name
    }

    fn properties(&self) -> &Configuration {
        &self.properties
    }

    fn is_client_tier(&self) -> Option<bool> {
        Some(false)
    }

    fn create_client_region(&self, name: &str, shape: ClientRegionShape) -> Result<Region> {
        Err(GridError::UnsupportedOperation(format!(
            "a peer cache cannot create client {} region [{}]",
            shape, name
        )))
    }

    fn create_region(&self, name: &str, shape: RegionShape) -> Result<Region> {
        self.regions.get_or_create(name, Shape::Peer(shape))
    }

    fn region(&self, name: &str) -> Option<Region> {
        self.regions.get(name)
    }

    fn regions(&self) -> Vec<Region> {
        self.regions.list()
    }

    fn cache_servers(&self) -> Vec<CacheServer> {
        self.servers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
