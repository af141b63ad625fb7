//! Mini Grid - A minimal distributed key-value cache
//!
//! Starts a process as a client, peer or server cache, resolves a region of
//! the matching shape and exercises it with a put/get round trip.

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod properties;
pub mod resolver;
pub mod runner;
pub mod server;

pub use bootstrap::CacheBootstrap;
pub use cache::{CacheHandle, CacheRole, GridCache, Key, Region};
pub use config::{Config, ConfigResolver};
pub use error::{GridError, Result};
pub use properties::{Configuration, PropertiesBuilder};
pub use resolver::RegionResolver;
pub use runner::{RunReport, Runner};
