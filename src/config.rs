//! Configuration Module
//!
//! Resolves the grid's runtime topology settings from a property source,
//! falling back to documented defaults.

use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheRole, ClientRegionShape, RegionShape};
use crate::error::{GridError, Result};

// == Setting Names ==
pub const CACHE_TYPE_PROPERTY: &str = "GRID_CACHE_TYPE";
pub const CACHE_SERVER_PORT_PROPERTY: &str = "GRID_CACHE_SERVER_PORT";
pub const CLIENT_REGION_TYPE_PROPERTY: &str = "GRID_CACHE_CLIENT_REGION_TYPE";
pub const PEER_REGION_TYPE_PROPERTY: &str = "GRID_CACHE_PEER_REGION_TYPE";
pub const LOCATOR_PORT_PROPERTY: &str = "GRID_LOCATOR_PORT";
pub const LOG_LEVEL_PROPERTY: &str = "GRID_LOG_LEVEL";
pub const LRU_MAX_ENTRIES_PROPERTY: &str = "GRID_REGION_LRU_MAX_ENTRIES";
pub const STARTUP_TIMEOUT_PROPERTY: &str = "GRID_STARTUP_TIMEOUT";

// == Defaults ==
pub const DEFAULT_CACHE_SERVER_PORT: u16 = 40404;
pub const DEFAULT_LOCATOR_PORT: u16 = 10334;
pub const DEFAULT_LOG_LEVEL: &str = "config";
pub const DEFAULT_LRU_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 30;

/// Tracing target of the run's status lines. Always enabled at `info`,
/// whatever the grid log level.
pub const STATUS_TARGET: &str = "mini_grid::status";

/// Filter used when the configuration itself cannot be resolved.
pub const FALLBACK_TRACING_FILTER: &str = "mini_grid=info,tower_http=info";

// == Property Source ==
/// A process-wide key/value source that settings are read from.
pub trait PropertySource {
    fn property(&self, name: &str) -> Option<String>;
}

/// Reads settings from environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl PropertySource for EnvSource {
    fn property(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl PropertySource for HashMap<String, String> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

// == Config Resolver ==
/// Resolves named settings against a [`PropertySource`].
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver<S = EnvSource> {
    source: S,
}

impl ConfigResolver<EnvSource> {
    pub fn from_env() -> Self {
        Self { source: EnvSource }
    }
}

impl<S: PropertySource> ConfigResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    // == Resolve ==
    /// Returns the source's value for `name`, or `default` when the value is
    /// absent or blank. Never fails.
    pub fn resolve(&self, name: &str, default: &str) -> String {
        self.non_blank(name)
            .unwrap_or_else(|| default.to_string())
    }

    /// Resolves `name` and parses it into `T`.
    ///
    /// Absent or blank values yield `default`; a value that does not parse is
    /// a [`GridError::Configuration`].
    pub fn resolve_parsed<T>(&self, name: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.non_blank(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| GridError::Configuration {
                    name: name.to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            None => Ok(default),
        }
    }

    fn non_blank(&self, name: &str) -> Option<String> {
        self.source
            .property(name)
            .filter(|value| !value.trim().is_empty())
    }
}

// == Config ==
/// Topology settings, resolved once at process entry and passed explicitly
/// to the bootstrap and region resolution stages.
#[derive(Debug, Clone)]
pub struct Config {
    /// Role of this process
    pub role: CacheRole,
    /// Port the cache server listens on (server-side roles)
    pub cache_server_port: u16,
    /// Shape of regions created by a client cache
    pub client_region_shape: ClientRegionShape,
    /// Shape of regions created by a peer cache
    pub peer_region_shape: RegionShape,
    /// Port of the locator peers join through
    pub locator_port: u16,
    /// Grid log level (`config`, `info`, `fine`, ...)
    pub log_level: String,
    /// Entry limit of LRU-shaped regions
    pub lru_max_entries: usize,
    /// Upper bound on cache server startup, in seconds
    pub startup_timeout_secs: u64,
}

impl Config {
    /// Loads settings from environment variables.
    ///
    /// # Environment Variables
    /// - `GRID_CACHE_TYPE` - `CLIENT`, `PEER` or `SERVER` (default: CLIENT)
    /// - `GRID_CACHE_SERVER_PORT` - cache server port (default: 40404)
    /// - `GRID_CACHE_CLIENT_REGION_TYPE` - client region shape (default: LOCAL)
    /// - `GRID_CACHE_PEER_REGION_TYPE` - peer region shape (default: PARTITION)
    /// - `GRID_LOCATOR_PORT` - locator port (default: 10334)
    /// - `GRID_LOG_LEVEL` - grid log level (default: config)
    /// - `GRID_REGION_LRU_MAX_ENTRIES` - LRU region entry limit (default: 1000)
    /// - `GRID_STARTUP_TIMEOUT` - cache server startup timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self> {
        Self::resolve(&ConfigResolver::from_env())
    }

    /// Loads settings through any resolver.
    pub fn resolve<S: PropertySource>(resolver: &ConfigResolver<S>) -> Result<Self> {
        Ok(Self {
            role: resolver.resolve_parsed(CACHE_TYPE_PROPERTY, CacheRole::Client)?,
            cache_server_port: resolver
                .resolve_parsed(CACHE_SERVER_PORT_PROPERTY, DEFAULT_CACHE_SERVER_PORT)?,
            client_region_shape: resolver
                .resolve_parsed(CLIENT_REGION_TYPE_PROPERTY, ClientRegionShape::Local)?,
            peer_region_shape: resolver
                .resolve_parsed(PEER_REGION_TYPE_PROPERTY, RegionShape::Partition)?,
            locator_port: resolver.resolve_parsed(LOCATOR_PORT_PROPERTY, DEFAULT_LOCATOR_PORT)?,
            log_level: resolver.resolve(LOG_LEVEL_PROPERTY, DEFAULT_LOG_LEVEL),
            lru_max_entries: resolver
                .resolve_parsed(LRU_MAX_ENTRIES_PROPERTY, DEFAULT_LRU_MAX_ENTRIES)?,
            startup_timeout_secs: resolver
                .resolve_parsed(STARTUP_TIMEOUT_PROPERTY, DEFAULT_STARTUP_TIMEOUT_SECS)?,
        })
    }

    /// Returns a copy of this config with a different role.
    pub fn with_role(mut self, role: CacheRole) -> Self {
        self.role = role;
        self
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    // == Tracing Filter ==
    /// Maps the grid log level onto a `tracing` filter directive.
    pub fn tracing_directive(&self) -> &'static str {
        match self.log_level.trim().to_ascii_lowercase().as_str() {
            "none" => "off",
            "severe" | "error" => "error",
            "warning" => "warn",
            "fine" => "debug",
            "finer" | "finest" | "all" => "trace",
            _ => "info",
        }
    }

    /// Full `EnvFilter` directive: the grid log level for crate internals and
    /// the HTTP layer, `info` for status lines.
    pub fn tracing_filter(&self) -> String {
        format!(
            "mini_grid={0},tower_http={0},{1}=info",
            self.tracing_directive(),
            STATUS_TARGET
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: CacheRole::Client,
            cache_server_port: DEFAULT_CACHE_SERVER_PORT,
            client_region_shape: ClientRegionShape::Local,
            peer_region_shape: RegionShape::Partition,
            locator_port: DEFAULT_LOCATOR_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            lru_max_entries: DEFAULT_LRU_MAX_ENTRIES,
            startup_timeout_secs: DEFAULT_STARTUP_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(pairs: &[(&str, &str)]) -> ConfigResolver<HashMap<String, String>> {
        ConfigResolver::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.role, CacheRole::Client);
        assert_eq!(config.cache_server_port, 40404);
        assert_eq!(config.client_region_shape, ClientRegionShape::Local);
        assert_eq!(config.peer_region_shape, RegionShape::Partition);
        assert_eq!(config.locator_port, 10334);
        assert_eq!(config.log_level, "config");
    }

    #[test]
    fn test_resolve_empty_source_uses_defaults() {
        let config = Config::resolve(&resolver(&[])).unwrap();
        assert_eq!(config.role, CacheRole::Client);
        assert_eq!(config.cache_server_port, DEFAULT_CACHE_SERVER_PORT);
        assert_eq!(config.locator_port, DEFAULT_LOCATOR_PORT);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.lru_max_entries, DEFAULT_LRU_MAX_ENTRIES);
    }

    #[test]
    fn test_resolve_blank_value_returns_default() {
        let r = resolver(&[(LOG_LEVEL_PROPERTY, "   "), ("EMPTY", "")]);
        assert_eq!(r.resolve(LOG_LEVEL_PROPERTY, "config"), "config");
        assert_eq!(r.resolve("EMPTY", "fallback"), "fallback");
        assert_eq!(r.resolve("MISSING", "fallback"), "fallback");
    }

    #[test]
    fn test_resolve_prefers_source_value() {
        let r = resolver(&[(LOG_LEVEL_PROPERTY, "fine")]);
        assert_eq!(r.resolve(LOG_LEVEL_PROPERTY, "config"), "fine");
    }

    #[test]
    fn test_resolve_overrides() {
        let config = Config::resolve(&resolver(&[
            (CACHE_TYPE_PROPERTY, "server"),
            (CACHE_SERVER_PORT_PROPERTY, "41414"),
            (PEER_REGION_TYPE_PROPERTY, "REPLICATE"),
            (LOCATOR_PORT_PROPERTY, "20334"),
        ]))
        .unwrap();

        assert_eq!(config.role, CacheRole::Server);
        assert_eq!(config.cache_server_port, 41414);
        assert_eq!(config.peer_region_shape, RegionShape::Replicate);
        assert_eq!(config.locator_port, 20334);
    }

    #[test]
    fn test_malformed_role_is_configuration_error() {
        let result = Config::resolve(&resolver(&[(CACHE_TYPE_PROPERTY, "LOCATOR")]));
        match result {
            Err(GridError::Configuration { name, value, .. }) => {
                assert_eq!(name, CACHE_TYPE_PROPERTY);
                assert_eq!(value, "LOCATOR");
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_port_is_configuration_error() {
        let result = Config::resolve(&resolver(&[(LOCATOR_PORT_PROPERTY, "99999")]));
        assert!(matches!(result, Err(GridError::Configuration { .. })));
    }

    #[test]
    fn test_tracing_directive() {
        let mut config = Config::default();
        assert_eq!(config.tracing_directive(), "info");

        config.log_level = "fine".to_string();
        assert_eq!(config.tracing_directive(), "debug");

        config.log_level = "WARNING".to_string();
        assert_eq!(config.tracing_directive(), "warn");
    }

    #[test]
    fn test_status_lines_survive_quiet_log_levels() {
        for level in ["severe", "error", "none"] {
            let mut config = Config::default();
            config.log_level = level.to_string();

            let output = capture_logs(&config.tracing_filter(), || {
                tracing::info!(target: STATUS_TARGET, "SUCCESS!");
                tracing::info!("Region internals");
            });

            assert!(output.contains("SUCCESS!"), "level {}: {}", level, output);
            assert!(!output.contains("Region internals"), "level {}: {}", level, output);
        }
    }

    #[test]
    fn test_tracing_filters_parse() {
        let config = Config::default();
        assert!(tracing_subscriber::EnvFilter::try_new(config.tracing_filter()).is_ok());
        assert!(tracing_subscriber::EnvFilter::try_new(FALLBACK_TRACING_FILTER).is_ok());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs(filter: &str, f: impl FnOnce()) -> String {
        use tracing_subscriber::layer::SubscriberExt;

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(filter))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(move || writer.clone()),
            );
        tracing::subscriber::with_default(subscriber, f);

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_from_env_reads_environment() {
        let resolver = ConfigResolver::from_env();
        // An unset variable always falls back
        assert_eq!(
            resolver.resolve("MINI_GRID_TEST_SURELY_UNSET_VARIABLE", "default"),
            "default"
        );
    }
}
