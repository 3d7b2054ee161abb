//! Todoist client.
//!
//! Implements the kernel's [`TaskService`] over the Todoist unified API v1.
//! Listings are cursor-paginated (`{ "results": [...], "next_cursor": ... }`)
//! and every request is authorized with the bearer token given at
//! construction.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{IntoUrl, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use todobot_kernel::{NewTask, Page, Project, Result, Section, ServiceError, Task, TaskService};

/// Todoist API base URL.
pub const TODOIST_API_BASE: &str = "https://api.todoist.com/api/v1";

/// Request timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest page size the API accepts.
const PAGE_LIMIT: &str = "200";

/// HTTP client for the Todoist API.
pub struct TodoistClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl TodoistClient {
    /// Create a client for the public API using `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: build_http(DEFAULT_TIMEOUT),
            base_url: TODOIST_API_BASE.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at a different API root (a proxy or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = build_http(timeout);
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Request helpers
    // -----------------------------------------------------------------------

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of a single task, with the id encoded as one path segment.
    fn task_url(&self, task_id: &str, action: Option<&str>, operation: &str) -> Result<Url> {
        let invalid = |reason: String| ServiceError::Transport {
            operation: operation.to_string(),
            reason,
        };
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("invalid base URL `{}`: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("base URL `{}` cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push("tasks")
            .push(task_id)
            .extend(action);
        Ok(url)
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> RequestBuilder {
        self.http
            .get(self.api_url(path))
            .bearer_auth(&self.token)
            .query(query)
    }

    fn post(&self, url: impl IntoUrl) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.token)
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<String> {
        let response = request.send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("timed out after {}s", self.timeout.as_secs())
            } else {
                e.to_string()
            };
            ServiceError::Transport {
                operation: operation.to_string(),
                reason,
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport {
                operation: operation.to_string(),
                reason: format!("failed to read response body: {e}"),
            })?;

        if status.is_success() {
            debug!(operation, status = status.as_u16(), "todoist request succeeded");
            return Ok(body);
        }

        warn!(operation, status = status.as_u16(), "todoist request failed");
        Err(status_error(operation, status, retry_after, &body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<T> {
        let body = self.send(request, operation).await?;
        serde_json::from_str(&body).map_err(|e| ServiceError::Decode {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }

    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
        cursor: Option<&str>,
        operation: &str,
    ) -> Result<Page<T>> {
        let mut query: Vec<(&str, &str)> = vec![("limit", PAGE_LIMIT)];
        query.extend_from_slice(extra);
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }
        self.send_json(self.get(path, &query), operation).await
    }

    /// Run a task mutation whose success response carries nothing useful.
    async fn mutate_task(
        &self,
        request: RequestBuilder,
        operation: &str,
        task_id: &str,
    ) -> Result<()> {
        match self.send(request, operation).await {
            Ok(_) => Ok(()),
            Err(ServiceError::Http { status: 404, .. }) => Err(ServiceError::NotFound {
                entity: "task",
                id: task_id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}

fn build_http(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("todobot/0.1")
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Map a non-success status to a typed error.
fn status_error(
    operation: &str,
    status: StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> ServiceError {
    let operation = operation.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized {
            operation,
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimited {
            operation,
            retry_after,
        },
        _ => ServiceError::Http {
            operation,
            status: status.as_u16(),
            message: error_message(body),
        },
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl TaskService for TodoistClient {
    async fn list_projects(&self, cursor: Option<&str>) -> Result<Page<Project>> {
        self.list("/projects", &[], cursor, "list_projects").await
    }

    async fn add_project(&self, name: &str) -> Result<Project> {
        let request = self.post(self.api_url("/projects")).json(&json!({ "name": name }));
        self.send_json(request, "add_project").await
    }

    async fn list_sections(
        &self,
        project_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Section>> {
        self.list("/sections", &[("project_id", project_id)], cursor, "list_sections")
            .await
    }

    async fn add_section(&self, name: &str, project_id: &str) -> Result<Section> {
        let request = self
            .post(self.api_url("/sections"))
            .json(&json!({ "name": name, "project_id": project_id }));
        self.send_json(request, "add_section").await
    }

    async fn list_tasks(&self, cursor: Option<&str>) -> Result<Page<Task>> {
        self.list("/tasks", &[], cursor, "list_tasks").await
    }

    async fn add_task(&self, task: &NewTask) -> Result<Task> {
        let request = self.post(self.api_url("/tasks")).json(task);
        self.send_json(request, "add_task").await
    }

    async fn update_task(&self, task_id: &str, content: &str) -> Result<()> {
        let request = self
            .post(self.task_url(task_id, None, "update_task")?)
            .json(&json!({ "content": content }));
        self.mutate_task(request, "update_task", task_id).await
    }

    async fn delete_task(&self, task_id: &str) -> Result<()> {
        let request = self
            .http
            .delete(self.task_url(task_id, None, "delete_task")?)
            .bearer_auth(&self.token);
        self.mutate_task(request, "delete_task", task_id).await
    }

    async fn close_task(&self, task_id: &str) -> Result<()> {
        let request = self.post(self.task_url(task_id, Some("close"), "close_task")?);
        self.mutate_task(request, "close_task", task_id).await
    }
}
