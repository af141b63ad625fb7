//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{Key, RegionStats};

/// Response body for `GET /regions/:region/entries/:key`
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub region: String,
    pub key: Key,
    pub value: String,
}

impl EntryResponse {
    pub fn new(region: impl Into<String>, key: Key, value: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            key,
            value: value.into(),
        }
    }
}

/// Response body for `PUT /regions/:region/entries/:key`
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    pub region: String,
    pub key: Key,
    /// Value the put replaced, `null` if the key was new
    pub previous: Option<String>,
}

impl PutResponse {
    pub fn new(region: impl Into<String>, key: Key, previous: Option<String>) -> Self {
        Self {
            region: region.into(),
            key,
            previous,
        }
    }
}

/// Response body for `DELETE /regions/:region/entries/:key`
#[derive(Debug, Clone, Serialize)]
pub struct RemoveResponse {
    pub message: String,
    pub key: Key,
    pub previous: String,
}

impl RemoveResponse {
    pub fn new(key: Key, previous: impl Into<String>) -> Self {
        Self {
            message: format!("Key '{}' removed successfully", key),
            key,
            previous: previous.into(),
        }
    }
}

/// One region in `GET /regions`
#[derive(Debug, Clone, Serialize)]
pub struct RegionSummary {
    pub name: String,
    pub shape: String,
    pub partitioned: bool,
    pub entries: usize,
}

/// Response body for `GET /regions`
#[derive(Debug, Clone, Serialize)]
pub struct RegionsResponse {
    pub regions: Vec<RegionSummary>,
}

/// Response body for `GET /regions/:region/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub region: String,
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub evictions: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(region: impl Into<String>, stats: &RegionStats) -> Self {
        Self {
            region: region.into(),
            hits: stats.hits,
            misses: stats.misses,
            puts: stats.puts,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Member name of the serving cache
    pub member: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(member: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            member: member.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
