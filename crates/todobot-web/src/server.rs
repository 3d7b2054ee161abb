//! Webhook server setup and startup.
//!
//! [`WebServer`] composes the Axum router and starts the HTTP listener.  When
//! given a mapping path it also starts the hot-reload watcher.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

use crate::WebConfig;
use crate::api;
use crate::error::{Result, WebError};
use crate::reload::spawn_mapping_watcher;
use crate::state::AppState;

/// The todobot webhook server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
    mapping_path: Option<PathBuf>,
}

impl WebServer {
    pub fn new(config: WebConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
            mapping_path: None,
        }
    }

    /// Hot-reload the mapping from `path` while the server runs.
    pub fn with_mapping_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_path = Some(path.into());
        self
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(api::health))
            .route(&self.config.webhook_path, post(api::webhook))
            .with_state(Arc::clone(&self.state))
    }

    /// Start the server and run until it fails.
    pub async fn start(self) -> Result<()> {
        let addr = self.addr();
        let router = self.router();

        if let Some(path) = &self.mapping_path {
            spawn_mapping_watcher(path.clone(), Arc::clone(&self.state.mapping));
        }

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| WebError::Bind {
                addr: addr.clone(),
                source,
            })?;

        info!(addr = %addr, webhook = %self.config.webhook_path, "starting webhook server");
        axum::serve(listener, router).await?;

        Ok(())
    }
}
