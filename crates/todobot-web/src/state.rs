//! Shared application state.
//!
//! [`AppState`] is wrapped in an `Arc` and shared by the webhook handler,
//! the long-polling loop and the mapping watcher.
//!
//! The `mapping` field supports hot reload: when the mapping file changes on
//! disk the watcher swaps in the new mapping and every subsequent command
//! classifies against it.

use std::sync::Arc;

use tokio::sync::RwLock;

use todobot_adapters::TelegramClient;
use todobot_intent::MappingConfig;
use todobot_kernel::TaskManager;

/// The current keyword mapping, replaceable at runtime.
pub type SharedMapping = Arc<RwLock<Arc<MappingConfig>>>;

/// Shared state accessible from every handler.
#[derive(Clone)]
pub struct AppState {
    /// Keyword mapping used to classify `/add` hints.
    pub mapping: SharedMapping,

    /// Task lifecycle operations.  `None` when no Todoist token is set; task
    /// commands then answer with a configuration hint.
    pub tasks: Option<Arc<TaskManager>>,

    /// Outgoing Telegram client.  `None` disables replies.
    pub telegram: Option<TelegramClient>,

    /// Expected value of the webhook secret header, if any.
    pub webhook_secret: Option<String>,
}

impl AppState {
    pub fn new(mapping: MappingConfig) -> Self {
        Self {
            mapping: Arc::new(RwLock::new(Arc::new(mapping))),
            tasks: None,
            telegram: None,
            webhook_secret: None,
        }
    }

    pub fn with_tasks(mut self, tasks: Arc<TaskManager>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    pub fn with_telegram(mut self, telegram: TelegramClient) -> Self {
        self.telegram = Some(telegram);
        self
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Snapshot of the current mapping.  The lock is released on return.
    pub async fn mapping(&self) -> Arc<MappingConfig> {
        Arc::clone(&*self.mapping.read().await)
    }
}
