//! Cache Properties Module
//!
//! Builds the configuration map a cache is created from: a base of member
//! name and log level, followed by role-dependent overlays.

use std::collections::BTreeMap;

use chrono::Local;
use serde::Serialize;

use crate::cache::CacheRole;
use crate::config::Config;

// == Property Names ==
pub const NAME: &str = "name";
pub const LOG_LEVEL: &str = "log-level";
pub const JMX_MANAGER: &str = "jmx-manager";
pub const JMX_MANAGER_START: &str = "jmx-manager-start";
pub const LOCATORS: &str = "locators";
pub const START_LOCATOR: &str = "start-locator";

/// Host the locator runs on.
pub const LOCATOR_HOST: &str = "localhost";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%I-%M-%S";

// == Configuration ==
/// Frozen snapshot of cache properties, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Configuration {
    properties: BTreeMap<String, String>,
}

impl Configuration {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// == Properties Builder ==
/// Builds a [`Configuration`].
///
/// A builder owns its own copy of the properties; building from an existing
/// configuration never changes that configuration.
#[derive(Debug, Clone, Default)]
pub struct PropertiesBuilder {
    properties: BTreeMap<String, String>,
}

impl PropertiesBuilder {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> Configuration {
        Configuration {
            properties: self.properties,
        }
    }
}

impl From<&Configuration> for PropertiesBuilder {
    fn from(configuration: &Configuration) -> Self {
        Self {
            properties: configuration.properties.clone(),
        }
    }
}

// == Overlays ==
/// Inputs the overlays decide on.
#[derive(Debug, Clone)]
pub struct OverlayContext {
    pub role: CacheRole,
    pub locator_port: u16,
}

impl OverlayContext {
    fn locator_address(&self) -> String {
        format!("{}[{}]", LOCATOR_HOST, self.locator_port)
    }
}

/// A named, pure transformation of a configuration.
#[derive(Clone, Copy)]
pub struct Overlay {
    pub name: &'static str,
    pub apply: fn(Configuration, &OverlayContext) -> Configuration,
}

/// Overlays in the order they are applied. Each one sees the output of the
/// previous one.
pub const OVERLAYS: [Overlay; 3] = [
    Overlay {
        name: JMX_MANAGER,
        apply: jmx_manager_overlay,
    },
    Overlay {
        name: LOCATORS,
        apply: locators_overlay,
    },
    Overlay {
        name: START_LOCATOR,
        apply: start_locator_overlay,
    },
];

fn jmx_manager_overlay(configuration: Configuration, ctx: &OverlayContext) -> Configuration {
    if !ctx.role.is_server() {
        return configuration;
    }
    PropertiesBuilder::from(&configuration)
        .set(JMX_MANAGER, "true")
        .set(JMX_MANAGER_START, "true")
        .build()
}

fn locators_overlay(configuration: Configuration, ctx: &OverlayContext) -> Configuration {
    if !ctx.role.is_server_side() {
        return configuration;
    }
    PropertiesBuilder::from(&configuration)
        .set(LOCATORS, ctx.locator_address())
        .build()
}

fn start_locator_overlay(configuration: Configuration, ctx: &OverlayContext) -> Configuration {
    if !ctx.role.is_server() {
        return configuration;
    }
    PropertiesBuilder::from(&configuration)
        .set(START_LOCATOR, ctx.locator_address())
        .build()
}

/// Applies every overlay in [`OVERLAYS`] order.
pub fn apply_overlays(base: Configuration, ctx: &OverlayContext) -> Configuration {
    OVERLAYS
        .iter()
        .fold(base, |configuration, overlay| (overlay.apply)(configuration, ctx))
}

// == Cache Properties ==
/// Builds the full property set for a cache of `config.role`.
pub fn cache_properties(app_name: &str, config: &Config) -> Configuration {
    let base = PropertiesBuilder::create()
        .set(NAME, member_name(app_name, config.role))
        .set(LOG_LEVEL, config.log_level.clone())
        .build();

    apply_overlays(
        base,
        &OverlayContext {
            role: config.role,
            locator_port: config.locator_port,
        },
    )
}

/// `<app>-<ROLE>-<timestamp>`
pub fn member_name(app_name: &str, role: CacheRole) -> String {
    format!(
        "{}-{}-{}",
        app_name,
        role.name(),
        Local::now().format(TIMESTAMP_FORMAT)
    )
}
