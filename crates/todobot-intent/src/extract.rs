//! Structured task extraction from free text.
//!
//! An alternative to keyword classification: a language model reads the
//! message and returns title, due date, priority, project and section as
//! JSON.  This module owns the prompt and the tolerant parsing of the
//! model's answer; the HTTP backend lives in `todobot-adapters`.
//!
//! The `/add` command does not use extraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use todobot_kernel::TaskDraft;

use crate::error::{IntentError, Result};

/// Priority assumed when the model gives none.
pub const DEFAULT_PRIORITY: u8 = 1;

/// Fields extracted from a task description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTask {
    pub title: String,
    pub due_date: Option<NaiveDate>,
    /// 1 (normal) to 4 (most urgent).
    pub priority: u8,
    pub project: Option<String>,
    pub section: Option<String>,
}

impl ExtractedTask {
    /// Turn the extraction into a creation request.  The due date is sent as
    /// an ISO date string, which the service accepts as a due phrase.
    pub fn into_draft(self) -> TaskDraft {
        let mut draft = TaskDraft::new(self.title)
            .with_project(self.project)
            .with_section(self.section)
            .with_priority(self.priority);
        if let Some(due) = self.due_date {
            draft = draft.with_due_string(due.format("%Y-%m-%d").to_string());
        }
        draft
    }
}

/// Something that can turn free text into an [`ExtractedTask`].
#[async_trait]
pub trait TaskExtractor: Send + Sync {
    /// Extract task fields from `text`.  `today` anchors relative dates such
    /// as "tomorrow".
    async fn extract(&self, text: &str, today: NaiveDate) -> Result<ExtractedTask>;
}

/// System prompt instructing the model how to answer.
pub fn system_prompt(today: NaiveDate) -> String {
    format!(
        r#"You turn short task descriptions into structured data.

Today's date is {today}.

Answer with a single JSON object and nothing else, using these keys:
- "title": the action to perform. Keep it as complete as possible; only drop words that clearly belong to another field.
- "due_date": the due date as YYYY-MM-DD, or null when no date is mentioned. Resolve relative dates against today's date.
- "priority": an integer from 1 (normal) to 4 (most urgent). Use 1 when not mentioned.
- "project": the main category of the task, or null when not mentioned.
- "section": a sub-category inside the project, or null when not mentioned.

Example input: "Review Q2 budget proposals by next Wednesday, high priority, for the 'Finance' team under 'Budgets'"
Example output:
{{"title": "Review Q2 budget proposals", "due_date": "<date of next Wednesday>", "priority": 3, "project": "Finance", "section": "Budgets"}}"#
    )
}

/// Parse a model answer into an [`ExtractedTask`].
///
/// Tolerates a surrounding Markdown code fence, a priority given as a string
/// or out of range, and an unparseable due date (dropped with a warning).
/// A missing or blank title is an error.
pub fn parse_extraction(answer: &str) -> Result<ExtractedTask> {
    let body = strip_code_fence(answer);
    let value: Value = serde_json::from_str(body)?;
    let object = value.as_object().ok_or_else(|| IntentError::ExtractionFailed {
        reason: "answer is not a JSON object".into(),
    })?;

    let title = text_field(object.get("title")).ok_or_else(|| IntentError::ExtractionFailed {
        reason: "answer has no title".into(),
    })?;

    let due_date = text_field(object.get("due_date")).and_then(|raw| {
        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                warn!(due_date = %raw, error = %e, "ignoring unparseable due date");
                None
            }
        }
    });

    Ok(ExtractedTask {
        title,
        due_date,
        priority: priority_field(object.get("priority")),
        project: text_field(object.get("project")),
        section: text_field(object.get("section")),
    })
}

fn strip_code_fence(answer: &str) -> &str {
    let trimmed = answer.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// A non-blank string field, trimmed.
fn text_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn priority_field(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    raw.map(|p| p.clamp(1, 4) as u8).unwrap_or(DEFAULT_PRIORITY)
}
