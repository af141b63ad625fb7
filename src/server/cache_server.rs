//! Cache Server
//!
//! Client-facing listener attached to a peer cache. Serves the cache's
//! regions over HTTP on a background task.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::handlers::AppState;
use super::routes::create_router;
use crate::cache::RegionRegistry;
use crate::config::{DEFAULT_CACHE_SERVER_PORT, DEFAULT_STARTUP_TIMEOUT_SECS};
use crate::error::{GridError, Result};

/// Address bound when no hostname-for-clients is set.
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

#[derive(Debug, Clone)]
struct Settings {
    hostname_for_clients: Option<String>,
    port: u16,
    startup_timeout: Duration,
}

#[derive(Debug)]
enum Lifecycle {
    Stopped,
    Running {
        local_addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<()>,
    },
}

#[derive(Debug)]
struct ServerInner {
    member: String,
    regions: Arc<RegionRegistry>,
    settings: StdMutex<Settings>,
    lifecycle: Mutex<Lifecycle>,
}

// == Cache Server ==
/// Handle to a cache server. Clones control the same listener.
#[derive(Debug, Clone)]
pub struct CacheServer {
    inner: Arc<ServerInner>,
}

impl CacheServer {
    /// Creates a stopped server for the given member's regions.
    pub fn new(member: impl Into<String>, regions: Arc<RegionRegistry>) -> Self {
        Self {
            inner: Arc::new(ServerInner {
                member: member.into(),
                regions,
                settings: StdMutex::new(Settings {
                    hostname_for_clients: None,
                    port: DEFAULT_CACHE_SERVER_PORT,
                    startup_timeout: Duration::from_secs(DEFAULT_STARTUP_TIMEOUT_SECS),
                }),
                lifecycle: Mutex::new(Lifecycle::Stopped),
            }),
        }
    }

    pub fn regions(&self) -> &Arc<RegionRegistry> {
        &self.inner.regions
    }

    // == Settings ==
    pub fn set_hostname_for_clients(&self, hostname: impl Into<String>) {
        self.settings().hostname_for_clients = Some(hostname.into());
    }

    pub fn hostname_for_clients(&self) -> Option<String> {
        self.settings().hostname_for_clients.clone()
    }

    /// Sets the listening port. `0` binds an ephemeral port.
    pub fn set_port(&self, port: u16) {
        self.settings().port = port;
    }

    /// Configured port; the bound port once the server has started.
    pub fn port(&self) -> u16 {
        self.settings().port
    }

    pub fn set_startup_timeout(&self, timeout: Duration) {
        self.settings().startup_timeout = timeout;
    }

    // == Start ==
    /// Binds the listener and starts serving on a background task.
    ///
    /// Fails if the server is already running, the address cannot be bound,
    /// or binding does not finish within the startup timeout.
    pub async fn start(&self) -> Result<()> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        if let Lifecycle::Running { local_addr, .. } = &*lifecycle {
            return Err(GridError::Listener(format!(
                "Cache server already running on {}",
                local_addr
            )));
        }

        let settings = self.settings().clone();
        let host = settings
            .hostname_for_clients
            .clone()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let listener = tokio::time::timeout(
            settings.startup_timeout,
            TcpListener::bind((host.as_str(), settings.port)),
        )
        .await
        .map_err(|_| {
            GridError::Listener(format!(
                "Timed out after {:?} binding {}:{}",
                settings.startup_timeout, host, settings.port
            ))
        })?
        .map_err(|e| {
            GridError::Listener(format!(
                "Failed to bind {}:{}: {}",
                host, settings.port, e
            ))
        })?;
        let local_addr = listener.local_addr()?;

        let app = create_router(AppState::new(
            self.inner.member.as_str(),
            self.inner.regions.clone(),
        ));
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                warn!("Cache server stopped with error: {}", e);
            }
        });

        self.settings().port = local_addr.port();
        *lifecycle = Lifecycle::Running {
            local_addr,
            shutdown,
            task,
        };

        info!(
            "Cache server for [{}] listening on {} (hostname-for-clients: {})",
            self.inner.member, local_addr, host
        );
        Ok(())
    }

    // == Stop ==
    /// Stops serving and waits for in-flight requests to finish. Stopping a
    /// stopped server does nothing.
    pub async fn stop(&self) {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        if let Lifecycle::Running { shutdown, task, .. } =
            std::mem::replace(&mut *lifecycle, Lifecycle::Stopped)
        {
            let _ = shutdown.send(());
            if let Err(e) = task.await {
                warn!("Cache server task ended abnormally: {}", e);
            }
            info!("Cache server for [{}] stopped", self.inner.member);
        }
    }

    pub async fn is_running(&self) -> bool {
        matches!(*self.inner.lifecycle.lock().await, Lifecycle::Running { .. })
    }

    /// Address the listener is bound to, while running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        match &*self.inner.lifecycle.lock().await {
            Lifecycle::Running { local_addr, .. } => Some(*local_addr),
            Lifecycle::Stopped => None,
        }
    }

    fn settings(&self) -> std::sync::MutexGuard<'_, Settings> {
        self.inner
            .settings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_server() -> CacheServer {
        let server = CacheServer::new("server-1", Arc::new(RegionRegistry::new(100)));
        server.set_hostname_for_clients("127.0.0.1");
        server.set_port(0);
        server
    }

    #[test]
    fn test_defaults() {
        let server = CacheServer::new("server-1", Arc::new(RegionRegistry::new(100)));
        assert_eq!(server.port(), DEFAULT_CACHE_SERVER_PORT);
        assert!(server.hostname_for_clients().is_none());
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let server = test_server();

        server.start().await.unwrap();
        assert!(server.is_running().await);
        let addr = server.local_addr().await.unwrap();
        assert_ne!(addr.port(), 0);
        assert_eq!(server.port(), addr.port());

        server.stop().await;
        assert!(!server.is_running().await);
        assert!(server.local_addr().await.is_none());
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let server = test_server();

        server.start().await.unwrap();
        let second = server.start().await;
        assert!(matches!(second, Err(GridError::Listener(_))));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_start_on_occupied_port_fails() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        let server = test_server();
        server.set_port(port);

        let result = server.start().await;
        assert!(matches!(result, Err(GridError::Listener(_))));
        assert!(!server.is_running().await);
    }

    #[tokio::test]
    async fn test_stop_when_stopped_is_noop() {
        let server = test_server();
        server.stop().await;
        assert!(!server.is_running().await);
    }
}
