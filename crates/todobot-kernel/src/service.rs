//! The remote task service capability.
//!
//! The kernel consumes this trait and never talks HTTP itself.  The
//! production implementation lives in `todobot-adapters`; tests substitute
//! an in-memory fake.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{NewTask, Page, Project, Section, Task};

/// Operations the kernel needs from the remote task-management service.
///
/// Implementations carry their own credential; nothing here takes a token.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// List one page of projects.  `cursor` is `None` for the first page.
    async fn list_projects(&self, cursor: Option<&str>) -> Result<Page<Project>>;

    /// Create a project and return it with its assigned id.
    async fn add_project(&self, name: &str) -> Result<Project>;

    /// List one page of sections belonging to `project_id`.
    async fn list_sections(&self, project_id: &str, cursor: Option<&str>)
    -> Result<Page<Section>>;

    /// Create a section inside `project_id`.
    async fn add_section(&self, name: &str, project_id: &str) -> Result<Section>;

    /// List one page of active tasks.
    async fn list_tasks(&self, cursor: Option<&str>) -> Result<Page<Task>>;

    /// Create a task.
    async fn add_task(&self, task: &NewTask) -> Result<Task>;

    /// Replace a task's content.
    async fn update_task(&self, task_id: &str, content: &str) -> Result<()>;

    /// Delete a task.
    async fn delete_task(&self, task_id: &str) -> Result<()>;

    /// Mark a task as completed.
    async fn close_task(&self, task_id: &str) -> Result<()>;
}
