//! Activity server listener
//!
//! Serves the activity route on its own TCP listener. Hosts that already run
//! an axum app can mount [`router`] instead.

use std::future::Future;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::hub::ActivityHub;
use crate::server::config::ServerConfig;
use crate::server::handler::activity_ws;

/// Router with the activity upgrade route mounted at `path`
pub fn router(hub: ActivityHub, path: &str) -> Router {
    Router::new().route(path, get(activity_ws)).with_state(hub)
}

/// Standalone activity server
pub struct ActivityServer {
    config: ServerConfig,
    hub: ActivityHub,
}

impl ActivityServer {
    /// Create a server for the given hub
    pub fn new(config: ServerConfig, hub: ActivityHub) -> Self {
        Self { config, hub }
    }

    /// Router for this server's path
    pub fn router(&self) -> Router {
        router(self.hub.clone(), &self.config.path)
    }

    /// Run the server until the process ends
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Bind the configured address and run until `shutdown` resolves
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.run_on(listener, shutdown).await
    }

    /// Run on an already bound listener until `shutdown` resolves
    ///
    /// When the signal fires the hub is shut down first, which closes every
    /// viewer socket, then the HTTP server drains. The hub is always shut
    /// down before this returns.
    pub async fn run_on<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(addr = %addr, path = %self.config.path, "Activity server listening");

        let hub = self.hub.clone();
        let signal = async move {
            shutdown.await;
            tracing::info!("Shutdown signal received");
            hub.shutdown().await;
        };

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await;

        self.hub.shutdown().await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "Activity server failed");
        }
        result?;
        Ok(())
    }
}
