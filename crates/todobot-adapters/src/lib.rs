//! todobot adapters.
//!
//! HTTP clients for the services the bot talks to:
//!
//! - **[`todoist`]** -- [`TodoistClient`], the production
//!   [`TaskService`](todobot_kernel::TaskService).
//! - **[`telegram`]** -- [`TelegramClient`] and the Bot API wire types.
//! - **[`openai`]** -- [`OpenAiExtractor`], a
//!   [`TaskExtractor`](todobot_intent::TaskExtractor) over chat completions.

pub mod error;
pub mod openai;
pub mod telegram;
pub mod todoist;

pub use error::{AdapterError, Result};
pub use openai::OpenAiExtractor;
pub use telegram::{Chat, Message, SECRET_TOKEN_HEADER, TelegramClient, Update, User};
pub use todoist::TodoistClient;
