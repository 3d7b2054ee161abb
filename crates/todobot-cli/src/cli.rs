//! CLI argument definitions for todobot.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// todobot -- file Telegram messages as Todoist tasks.
#[derive(Parser)]
#[command(
    name = "todobot",
    version,
    about = "todobot -- Telegram to Todoist task bot",
    long_about = "A Telegram bot that files tasks into Todoist, choosing the project and \
                  section from keywords in the message."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server.
    Serve {
        /// Address to bind the HTTP server to.
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on.
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Receive updates by long polling instead of a webhook.
    Poll {
        /// Telegram long-polling timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Register the webhook URL with Telegram.
    SetWebhook {
        /// Public HTTPS URL Telegram should post updates to.
        url: String,
    },

    /// Remove the registered webhook.
    DeleteWebhook,

    /// Show how a message would be classified, without touching Todoist.
    Classify {
        /// Message text, optionally `<task> - <hint>`.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Extract structured task fields with the language model.
    Extract {
        /// Free-form task description.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show current configuration status.
    Status,
}
