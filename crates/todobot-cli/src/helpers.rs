//! Startup helpers shared by the subcommands.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use todobot_adapters::{OpenAiExtractor, TelegramClient, TodoistClient};
use todobot_intent::MappingConfig;
use todobot_kernel::TaskManager;
use todobot_web::AppState;

use crate::config::AppConfig;

pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const TODOIST_TOKEN_VAR: &str = "TODOIST_API_TOKEN";
pub const WEBHOOK_SECRET_VAR: &str = "TELEGRAM_WEBHOOK_SECRET";
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Initialize the `tracing` subscriber.
///
/// Respects `RUST_LOG` if set; otherwise uses `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Read an environment variable, treating empty values as unset.
pub fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Load the keyword mapping, or an empty one if it cannot be loaded.
///
/// With an empty mapping every task goes to the inbox, which keeps the bot
/// usable while the file is being fixed.
pub fn load_mapping_or_empty(config: &AppConfig) -> MappingConfig {
    match MappingConfig::load(&config.mappings.path) {
        Ok(mapping) => mapping,
        Err(e) => {
            warn!(error = %e, "no usable project mapping, all tasks go to the inbox");
            MappingConfig::default()
        }
    }
}

/// Telegram client for the configured API root.  The bot token is required.
pub fn telegram_client(config: &AppConfig) -> Result<TelegramClient> {
    let token = env_non_empty(TELEGRAM_TOKEN_VAR)
        .with_context(|| format!("{TELEGRAM_TOKEN_VAR} is not set"))?;
    Ok(TelegramClient::new(token).with_api_base(&config.telegram.api_base))
}

/// Task manager backed by Todoist, if a token is configured.
pub fn task_manager(config: &AppConfig) -> Option<Arc<TaskManager>> {
    let Some(token) = env_non_empty(TODOIST_TOKEN_VAR) else {
        warn!("{TODOIST_TOKEN_VAR} is not set, task commands are disabled");
        return None;
    };
    let client = TodoistClient::new(token)
        .with_base_url(&config.todoist.base_url)
        .with_timeout(config.request_timeout());
    Some(Arc::new(TaskManager::new(Arc::new(client))))
}

/// Extractor for the configured model.  The API key is required.
pub fn extractor(config: &AppConfig) -> Result<OpenAiExtractor> {
    let key = env_non_empty(OPENAI_KEY_VAR)
        .with_context(|| format!("{OPENAI_KEY_VAR} is not set"))?;
    Ok(OpenAiExtractor::new(key)
        .with_base_url(&config.extractor.base_url)
        .with_model(&config.extractor.model))
}

/// Everything a running bot needs.
pub fn build_state(config: &AppConfig, telegram: TelegramClient) -> AppState {
    let mut state = AppState::new(load_mapping_or_empty(config)).with_telegram(telegram);
    if let Some(tasks) = task_manager(config) {
        state = state.with_tasks(tasks);
    }
    if let Some(secret) = env_non_empty(WEBHOOK_SECRET_VAR) {
        state = state.with_webhook_secret(secret);
    } else {
        info!("{WEBHOOK_SECRET_VAR} is not set, webhook calls are not authenticated");
    }
    state
}
