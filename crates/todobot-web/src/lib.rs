//! Telegram front end for todobot.
//!
//! This crate turns incoming Telegram updates into task operations:
//!
//! - [`bot`] parses commands, classifies `/add` hints and builds replies.
//! - [`api`] holds the Axum handlers for the webhook and the health check.
//! - [`reload`] hot-reloads the keyword mapping when its file changes.
//! - [`WebServer`] wires the routes together and serves them.

pub mod api;
pub mod bot;
pub mod error;
pub mod reload;
pub mod server;
pub mod state;

pub use error::{Result, WebError};
pub use reload::{reload_mapping, spawn_mapping_watcher};
pub use server::WebServer;
pub use state::{AppState, SharedMapping};

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
    /// Route Telegram posts updates to.
    pub webhook_path: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 5002,
            webhook_path: "/webhook".into(),
        }
    }
}
