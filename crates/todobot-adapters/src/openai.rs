//! OpenAI-backed task extraction.
//!
//! Sends the extraction prompt to a chat-completions endpoint in JSON mode
//! and hands the answer to [`parse_extraction`].  Any OpenAI-compatible
//! server works through [`OpenAiExtractor::with_base_url`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use tracing::{debug, info};

use todobot_intent::{ExtractedTask, IntentError, TaskExtractor, parse_extraction, system_prompt};

use crate::error::{AdapterError, Result};

/// OpenAI API root.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Model used unless configured otherwise.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Extracts task fields with a chat-completions model.
pub struct OpenAiExtractor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("todobot/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: OPENAI_API_BASE.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one completion and return the assistant's raw answer.
    async fn complete(&self, text: &str, today: NaiveDate) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(AdapterError::AuthRequired {
                provider: "openai".to_string(),
            });
        }

        let body = json!({
            "model": self.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system_prompt(today) },
                { "role": "user", "content": text },
            ],
        });

        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "requesting task extraction");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdapterError::Timeout {
                        seconds: REQUEST_TIMEOUT.as_secs(),
                        reason: "chat completion timed out".into(),
                    }
                } else {
                    AdapterError::Request {
                        method: "chat/completions".into(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| AdapterError::UnexpectedResponse {
                method: "chat/completions".into(),
                reason: format!("failed to parse response: {e}"),
            })?;

        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(AdapterError::Http {
                method: "chat/completions".into(),
                status: status.as_u16(),
                message: message.to_string(),
            });
        }

        payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AdapterError::UnexpectedResponse {
                method: "chat/completions".into(),
                reason: "no message content in first choice".into(),
            })
    }
}

#[async_trait]
impl TaskExtractor for OpenAiExtractor {
    async fn extract(&self, text: &str, today: NaiveDate) -> todobot_intent::Result<ExtractedTask> {
        let answer = self
            .complete(text, today)
            .await
            .map_err(|e| IntentError::Backend(e.to_string()))?;
        let task = parse_extraction(&answer)?;
        info!(title = %task.title, project = ?task.project, "task extracted");
        Ok(task)
    }
}
