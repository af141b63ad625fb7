//! Cache Bootstrap
//!
//! Creates the one cache of this process. Server-side roles also get a
//! started cache server; a cache server that fails to start fails the
//! whole bootstrap.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{CacheHandle, CacheRole, ClientCache, PeerCache};
use crate::config::{Config, STATUS_TARGET};
use crate::error::{GridError, Result};
use crate::properties::Configuration;
use crate::server::CacheServer;

/// Hostname advertised to clients by the cache server.
pub const HOSTNAME_FOR_CLIENTS: &str = "localhost";

// == Cache Bootstrap ==
#[derive(Debug, Clone)]
pub struct CacheBootstrap {
    config: Config,
}

impl CacheBootstrap {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    // == New Cache ==
    /// Builds a cache for `role` from the frozen `properties`.
    ///
    /// # Errors
    /// [`GridError::Bootstrap`] if the cache cannot be created or its cache
    /// server cannot be started.
    pub async fn new_cache(&self, role: CacheRole, properties: Configuration) -> Result<CacheHandle> {
        info!(target: STATUS_TARGET, "{} CACHE", role);
        for (name, value) in properties.iter() {
            debug!("Cache property {} = {}", name, value);
        }

        if role.is_client() {
            let cache = ClientCache::new(properties, self.config.lru_max_entries)
                .map_err(|e| GridError::bootstrap("create client cache", e))?;
            return Ok(Arc::new(cache));
        }

        let cache = PeerCache::new(properties, self.config.lru_max_entries)
            .map_err(|e| GridError::bootstrap("create peer cache", e))?;
        self.add_cache_server(&cache).await?;

        Ok(Arc::new(cache))
    }

    // == Add Cache Server ==
    async fn add_cache_server(&self, cache: &PeerCache) -> Result<CacheServer> {
        let server = cache.add_cache_server();

        server.set_hostname_for_clients(HOSTNAME_FOR_CLIENTS);
        server.set_port(self.config.cache_server_port);
        server.set_startup_timeout(self.config.startup_timeout());

        server
            .start()
            .await
            .map_err(|e| GridError::bootstrap("start cache server", e))?;

        Ok(server)
    }
}
