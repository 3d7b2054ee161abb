//! Telegram Bot API client.
//!
//! Covers what the bot needs: identifying itself, sending replies, polling
//! for updates and managing the webhook.  Every method is POSTed to
//! `{api_base}/bot{token}/{method}` and the `{ ok, result }` envelope is
//! checked before the result is decoded.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{AdapterError, Result};

/// Telegram Bot API root.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Header Telegram uses to echo the webhook secret.
pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Timeout for ordinary calls.  Long polls get their own, longer one.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// An incoming update.  Only the message kinds the bot reacts to are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_message: Option<Message>,
}

impl Update {
    /// Chat id and text of the update's message, if it carries text.
    /// Edits are ignored.
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id, text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    #[serde(default)]
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// `private`, `group`, `supergroup` or `channel`.
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Telegram Bot API client bound to one bot token.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(bot_token: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("todobot/0.1")
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token: bot_token.into(),
        }
    }

    /// Use a different API root, e.g. a local Bot API server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a full Telegram Bot API URL for the given method.
    fn api_url(&self, method: &str) -> Result<String> {
        if self.bot_token.is_empty() {
            return Err(AdapterError::AuthRequired {
                provider: "telegram".to_string(),
            });
        }
        Ok(format!("{}/bot{}/{}", self.api_base, self.bot_token, method))
    }

    /// Parse a Telegram Bot API response, checking the `ok` field for errors.
    ///
    /// Telegram responses follow the format:
    /// `{ "ok": true, "result": {...} }` on success, or
    /// `{ "ok": false, "error_code": 400, "description": "..." }` on failure.
    pub fn parse_telegram_response(response: &Value, method: &str) -> Result<()> {
        let ok = response
            .get("ok")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        if !ok {
            let error_code = response
                .get("error_code")
                .and_then(|v| v.as_i64())
                .unwrap_or(-1);
            let description = response
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            return Err(AdapterError::Telegram {
                method: method.to_string(),
                error_code,
                description: description.to_string(),
            });
        }

        Ok(())
    }

    /// Call `method` with a JSON body and decode the envelope's `result`.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: Value,
        timeout: Duration,
    ) -> Result<T> {
        let url = self.api_url(method)?;
        debug!(method, "calling Telegram Bot API");

        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdapterError::Timeout {
                        seconds: timeout.as_secs(),
                        reason: format!("Telegram `{method}` timed out"),
                    }
                } else {
                    AdapterError::Request {
                        method: method.to_string(),
                        // Without the URL: it embeds the bot token.
                        reason: e.without_url().to_string(),
                    }
                }
            })?;

        let json_resp: Value =
            response
                .json()
                .await
                .map_err(|e| AdapterError::UnexpectedResponse {
                    method: method.to_string(),
                    reason: format!("failed to parse response: {}", e.without_url()),
                })?;

        Self::parse_telegram_response(&json_resp, method)?;

        let result = json_resp.get("result").cloned().unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(|e| AdapterError::UnexpectedResponse {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Methods
    // -----------------------------------------------------------------------

    /// Identify the bot.  Doubles as a token check.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", json!({}), REQUEST_TIMEOUT).await
    }

    /// Send a plain-text message.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        self.call("sendMessage", body, REQUEST_TIMEOUT).await
    }

    /// Long-poll for updates with ids at or above `offset`.  Blocks on the
    /// server for up to `timeout_secs`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut body = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }
        let timeout = REQUEST_TIMEOUT + Duration::from_secs(timeout_secs);
        self.call("getUpdates", body, timeout).await
    }

    /// Register `url` as the webhook.  When `secret` is given Telegram sends
    /// it back in [`SECRET_TOKEN_HEADER`] on every delivery.
    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<bool> {
        let mut body = json!({
            "url": url,
            "allowed_updates": ["message"],
        });
        if let Some(secret) = secret {
            body["secret_token"] = json!(secret);
        }
        self.call("setWebhook", body, REQUEST_TIMEOUT).await
    }

    /// Remove the webhook so that `getUpdates` works again.
    pub async fn delete_webhook(&self) -> Result<bool> {
        self.call("deleteWebhook", json!({}), REQUEST_TIMEOUT).await
    }
}
