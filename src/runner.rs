//! Runner
//!
//! Bootstraps the cache for the configured role, resolves the example region
//! and checks a single put/get round trip.

use tracing::info;

use crate::bootstrap::CacheBootstrap;
use crate::cache::{CacheHandle, CacheRole, Key, Region};
use crate::config::{Config, STATUS_TARGET};
use crate::error::{GridError, Result};
use crate::properties::cache_properties;
use crate::resolver::RegionResolver;

/// Name the cache member is prefixed with.
pub const APP_NAME: &str = "MiniGrid";

/// Region the demonstration writes to.
pub const REGION_NAME: &str = "Example";

const KEY: i64 = 1;
const VALUE: &str = "TEST";

// == Run Report ==
/// Outcome of a successful run. Holds the live cache, which stays usable.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub role: CacheRole,
    pub cache: CacheHandle,
    pub region: Region,
    pub key: Key,
    pub value: String,
}

// == Runner ==
#[derive(Debug)]
pub struct Runner {
    arguments: Vec<String>,
    config: Config,
}

impl Runner {
    /// Creates a runner. `arguments` must be present, even if empty.
    pub fn new(arguments: Option<Vec<String>>, config: Config) -> Result<Self> {
        let arguments = arguments.ok_or_else(|| {
            GridError::InvalidArguments("Program arguments are required".to_string())
        })?;
        Ok(Self { arguments, config })
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // == Run ==
    /// Runs the bootstrap and round trip.
    ///
    /// Running twice against the same cache fails the "no previous value"
    /// check; that is expected.
    pub async fn run(&self) -> Result<RunReport> {
        let role = self.config.role;
        let properties = cache_properties(APP_NAME, &self.config);

        let cache = CacheBootstrap::new(self.config.clone())
            .new_cache(role, properties)
            .await?;

        let region = RegionResolver::new(&self.config).new_region(cache.as_ref(), REGION_NAME)?;

        check(
            cache.region(REGION_NAME).is_some(),
            format!("region [{}] should exist", REGION_NAME),
        )?;
        check(
            region.name() == REGION_NAME,
            format!("region name should be [{}], was [{}]", REGION_NAME, region.name()),
        )?;

        let key = Key::from(KEY);
        let existing = region.get(key.clone()).await;
        check(
            existing.is_none(),
            format!("key [{}] should be empty, found {:?}", key, existing),
        )?;

        let previous = region.put(key.clone(), VALUE).await;
        check(
            previous.is_none(),
            format!("put should return no previous value, returned {:?}", previous),
        )?;

        let value = region.get(key.clone()).await.unwrap_or_default();
        check(
            value == VALUE,
            format!("value for key [{}] should be [{}], was [{}]", key, VALUE, value),
        )?;

        info!(target: STATUS_TARGET, "Value for Key [{}] is: {}", key, value);
        info!(target: STATUS_TARGET, "SUCCESS!");

        Ok(RunReport {
            role,
            cache,
            region,
            key,
            value,
        })
    }
}

fn check(condition: bool, message: String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(GridError::Assertion(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arguments_fail_fast() {
        let result = Runner::new(None, Config::default());
        match result {
            Err(GridError::InvalidArguments(msg)) => {
                assert!(msg.contains("Program arguments are required"))
            }
            other => panic!("expected invalid arguments, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_arguments_are_accepted() {
        let runner = Runner::new(Some(Vec::new()), Config::default()).unwrap();
        assert!(runner.arguments().is_empty());
    }

    #[tokio::test]
    async fn test_client_run() {
        let runner = Runner::new(Some(Vec::new()), Config::default()).unwrap();

        let report = runner.run().await.unwrap();

        assert_eq!(report.role, CacheRole::Client);
        assert_eq!(report.region.name(), REGION_NAME);
        assert!(report.region.shape().is_client());
        assert_eq!(report.key, Key::Int(1));
        assert_eq!(report.value, "TEST");
    }

    #[test]
    fn test_check() {
        assert!(check(true, "unused".to_string()).is_ok());
        assert!(matches!(
            check(false, "broken".to_string()),
            Err(GridError::Assertion(_))
        ));
    }

    #[test]
    fn test_client_run_blocking() {
        let runner = Runner::new(Some(vec!["--verbose".to_string()]), Config::default()).unwrap();

        let report = tokio_test::block_on(runner.run()).unwrap();
        assert_eq!(report.region.len(), 1);
    }
}
