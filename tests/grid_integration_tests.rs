//! Integration Tests for the grid
//!
//! Runs the full bootstrap for each role and talks to a live cache server
//! over HTTP.

use mini_grid::{
    cache::{CacheRole, ClientRegionShape, Key, RegionShape, Shape},
    config::{ConfigResolver, CACHE_SERVER_PORT_PROPERTY, CACHE_TYPE_PROPERTY},
    runner::REGION_NAME,
    CacheHandle, Config, GridError, Runner,
};
use serde_json::{json, Value};
use std::collections::HashMap;

// == Helper Functions ==

/// Grabs a port the OS considers free right now.
fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn config_for(role: CacheRole, port: u16) -> Config {
    let source: HashMap<String, String> = [
        (CACHE_TYPE_PROPERTY.to_string(), role.name().to_string()),
        (CACHE_SERVER_PORT_PROPERTY.to_string(), port.to_string()),
    ]
    .into_iter()
    .collect();
    Config::resolve(&ConfigResolver::new(source)).unwrap()
}

async fn base_url(cache: &CacheHandle) -> String {
    let server = cache.cache_servers().into_iter().next().unwrap();
    let addr = server.local_addr().await.unwrap();
    format!("http://{}", addr)
}

async fn stop(cache: &CacheHandle) {
    for server in cache.cache_servers() {
        server.stop().await;
    }
}

// == Client Role ==

#[tokio::test]
async fn test_client_run_round_trip() {
    let runner = Runner::new(Some(Vec::new()), config_for(CacheRole::Client, 0)).unwrap();

    let report = runner.run().await.unwrap();

    assert_eq!(report.role, CacheRole::Client);
    assert_eq!(report.region.shape(), Shape::Client(ClientRegionShape::Local));
    assert_eq!(report.region.get(1).await, Some("TEST".to_string()));
    assert!(report.cache.cache_servers().is_empty());
}

#[tokio::test]
async fn test_put_after_run_returns_previous_value() {
    let runner = Runner::new(Some(Vec::new()), config_for(CacheRole::Client, 0)).unwrap();
    let report = runner.run().await.unwrap();

    // The region already holds key 1, so a second put sees a previous value
    let previous = report.region.put(Key::from(1), "TEST").await;
    assert_eq!(previous, Some("TEST".to_string()));
}

#[test]
fn test_missing_arguments_fail_before_bootstrap() {
    let result = Runner::new(None, config_for(CacheRole::Server, free_port()));
    assert!(matches!(result, Err(GridError::InvalidArguments(_))));
}

// == Server Role ==

#[tokio::test]
async fn test_server_run_starts_listener_on_resolved_port() {
    let port = free_port();
    let runner = Runner::new(Some(Vec::new()), config_for(CacheRole::Server, port)).unwrap();

    let report = runner.run().await.unwrap();

    let servers = report.cache.cache_servers();
    assert_eq!(servers.len(), 1);
    assert!(servers[0].is_running().await);
    assert_eq!(servers[0].port(), port);
    assert_eq!(servers[0].local_addr().await.unwrap().port(), port);

    assert_eq!(report.region.shape(), Shape::Peer(RegionShape::Partition));
    assert!(!report.region.shape().is_client());

    stop(&report.cache).await;
}

#[tokio::test]
async fn test_server_serves_example_region_over_http() {
    let runner = Runner::new(Some(Vec::new()), config_for(CacheRole::Server, free_port())).unwrap();
    let report = runner.run().await.unwrap();
    let base = base_url(&report.cache).await;
    let client = reqwest::Client::new();

    // Value written by the run is visible to clients
    let entry: Value = client
        .get(format!("{}/regions/{}/entries/1", base, REGION_NAME))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entry["key"], 1);
    assert_eq!(entry["value"], "TEST");

    // Client writes land in the server's region
    let put: Value = client
        .put(format!("{}/regions/{}/entries/2", base, REGION_NAME))
        .json(&json!({ "value": "SECOND" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(put["previous"].is_null());
    assert_eq!(report.region.get(2).await, Some("SECOND".to_string()));

    let regions: Value = client
        .get(format!("{}/regions", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(regions["regions"][0]["name"], REGION_NAME);
    assert_eq!(regions["regions"][0]["shape"], "PARTITION");
    assert_eq!(regions["regions"][0]["entries"], 2);

    let missing = client
        .get(format!("{}/regions/{}/entries/404", base, REGION_NAME))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    stop(&report.cache).await;
}

#[tokio::test]
async fn test_peer_run_uses_partitioned_region() {
    let runner = Runner::new(Some(Vec::new()), config_for(CacheRole::Peer, free_port())).unwrap();

    let report = runner.run().await.unwrap();

    assert!(report.region.shape().is_partitioned());
    assert!(report.cache.properties().get("locators").is_some());
    assert!(report.cache.properties().get("jmx-manager").is_none());

    let health: Value = reqwest::get(format!("{}/health", base_url(&report.cache).await))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");

    stop(&report.cache).await;
}

#[tokio::test]
async fn test_server_run_on_occupied_port_is_bootstrap_failure() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    // "localhost" may also resolve to the IPv6 loopback
    let _occupied_v6 = std::net::TcpListener::bind(("::1", port));

    let runner = Runner::new(Some(Vec::new()), config_for(CacheRole::Server, port)).unwrap();
    let result = runner.run().await;

    match result {
        Err(err @ GridError::Bootstrap { .. }) => assert!(err.is_fatal_startup()),
        other => panic!("expected bootstrap failure, got {:?}", other.map(|r| r.role)),
    }
}
