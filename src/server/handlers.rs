//! Cache Server Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{Key, Region, RegionRegistry};
use crate::error::{GridError, Result};
use crate::models::{
    EntryResponse, HealthResponse, PutRequest, PutResponse, RegionSummary, RegionsResponse,
    RemoveResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Holds the serving cache's region registry; regions are never created
/// through the listener.
#[derive(Clone)]
pub struct AppState {
    /// Member name of the serving cache
    pub member: Arc<str>,
    /// Regions of the serving cache
    pub regions: Arc<RegionRegistry>,
}

impl AppState {
    pub fn new(member: impl Into<Arc<str>>, regions: Arc<RegionRegistry>) -> Self {
        Self {
            member: member.into(),
            regions,
        }
    }

    fn region(&self, name: &str) -> Result<Region> {
        self.regions
            .get(name)
            .ok_or_else(|| GridError::RegionNotFound(name.to_string()))
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.member.as_ref()))
}

/// Handler for GET /regions
pub async fn list_regions_handler(State(state): State<AppState>) -> Json<RegionsResponse> {
    let regions = state
        .regions
        .list()
        .into_iter()
        .map(|region| RegionSummary {
            name: region.name().to_string(),
            shape: region.shape().to_string(),
            partitioned: region.shape().is_partitioned(),
            entries: region.len(),
        })
        .collect();

    Json(RegionsResponse { regions })
}

/// Handler for GET /regions/:region/stats
pub async fn region_stats_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let region = state.region(&name)?;
    let stats = region.stats().await;

    Ok(Json(StatsResponse::new(name, &stats)))
}

/// Handler for GET /regions/:region/entries/:key
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<EntryResponse>> {
    let region = state.region(&name)?;
    let key = Key::from_segment(&key);

    match region.get(key.clone()).await {
        Some(value) => Ok(Json(EntryResponse::new(name, key, value))),
        None => Err(GridError::KeyNotFound {
            region: name,
            key: key.to_string(),
        }),
    }
}

/// Handler for PUT /regions/:region/entries/:key
///
/// Responds with the value the put replaced, if any.
pub async fn put_entry_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    let key = Key::from_segment(&key);
    if let Some(error_msg) = req.validate(&key) {
        return Err(GridError::InvalidArguments(error_msg));
    }

    let region = state.region(&name)?;
    let previous = region.put(key.clone(), req.value).await;

    Ok(Json(PutResponse::new(name, key, previous)))
}

/// Handler for DELETE /regions/:region/entries/:key
pub async fn remove_entry_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<RemoveResponse>> {
    let region = state.region(&name)?;
    let key = Key::from_segment(&key);

    match region.remove(key.clone()).await {
        Some(previous) => Ok(Json(RemoveResponse::new(key, previous))),
        None => Err(GridError::KeyNotFound {
            region: name,
            key: key.to_string(),
        }),
    }
}
