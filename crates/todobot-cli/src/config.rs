//! Application configuration.
//!
//! Reads `config/default.toml`.  Every section and field is optional and
//! falls back to the defaults below; a missing file means all defaults.
//! Secrets never live here: they come from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use todobot_adapters::openai::{DEFAULT_MODEL, OPENAI_API_BASE};
use todobot_adapters::telegram::TELEGRAM_API_BASE;
use todobot_adapters::todoist::TODOIST_API_BASE;
use todobot_web::WebConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub todoist: TodoistConfig,
    pub telegram: TelegramConfig,
    pub web: WebSection,
    pub mappings: MappingsConfig,
    pub extractor: ExtractorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TodoistConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for TodoistConfig {
    fn default() -> Self {
        Self {
            base_url: TODOIST_API_BASE.into(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub api_base: String,
    /// Long-polling timeout in seconds.
    pub poll_timeout: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: TELEGRAM_API_BASE.into(),
            poll_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebSection {
    pub bind: String,
    pub port: u16,
    pub webhook_path: String,
}

impl Default for WebSection {
    fn default() -> Self {
        let web = WebConfig::default();
        Self {
            bind: web.bind_addr,
            port: web.port,
            webhook_path: web.webhook_path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MappingsConfig {
    pub path: PathBuf,
}

impl Default for MappingsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/projects.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_API_BASE.into(),
            model: DEFAULT_MODEL.into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or defaults if the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.todoist.request_timeout_secs.max(1))
    }

    /// Web server settings, with the webhook path forced to start with `/`.
    pub fn web_config(&self) -> WebConfig {
        let path = self.web.webhook_path.trim();
        let webhook_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        WebConfig {
            bind_addr: self.web.bind.clone(),
            port: self.web.port,
            webhook_path,
        }
    }
}
