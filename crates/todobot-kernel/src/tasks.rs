//! Task lifecycle operations built on the reconciler.
//!
//! Every public method returns a plain `Option`, `Vec` or `bool`.  Remote
//! failures are logged here and never reach the caller as errors.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::model::{NewTask, Task, TaskDraft};
use crate::pagination::{collect_matching, find_first};
use crate::reconciler::CategoryReconciler;
use crate::service::TaskService;

/// Creates, finds and mutates tasks on the remote service.
pub struct TaskManager {
    service: Arc<dyn TaskService>,
    reconciler: CategoryReconciler,
}

impl TaskManager {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        let reconciler = CategoryReconciler::new(Arc::clone(&service));
        Self {
            service,
            reconciler,
        }
    }

    pub fn reconciler(&self) -> &CategoryReconciler {
        &self.reconciler
    }

    /// Create a task, resolving (or creating) its project and section first.
    ///
    /// The section is only resolved once the project has resolved.  Ids that
    /// fail to resolve are left out, so the task lands in the service's
    /// default location rather than being dropped.
    pub async fn create_task(&self, draft: &TaskDraft) -> Option<Task> {
        let project_id = self.reconciler.resolve_project(draft.project.as_deref()).await;
        if draft.project.is_some() && project_id.is_none() {
            warn!(project = ?draft.project, "project unresolved, task goes to the default project");
        }

        let section_id = match project_id.as_deref() {
            Some(pid) => {
                self.reconciler
                    .resolve_section(draft.section.as_deref(), Some(pid))
                    .await
            }
            None => None,
        };

        let new_task = NewTask {
            content: draft.content.clone(),
            project_id,
            section_id,
            due_string: draft.due_string.clone(),
            priority: draft.priority,
        };

        match self.service.add_task(&new_task).await {
            Ok(task) => {
                info!(
                    id = %task.id,
                    content = %task.content,
                    project_id = ?task.project_id,
                    section_id = ?task.section_id,
                    "task created"
                );
                Some(task)
            }
            Err(e) => {
                error!(content = %draft.content, error = %e, "failed to create task");
                None
            }
        }
    }

    /// Find the first active task whose content equals `content` once both
    /// are trimmed.  Case-sensitive; no partial matches.
    pub async fn find_task_by_content(&self, content: &str) -> Option<Task> {
        let query = content.trim();
        let service = &self.service;
        let found = find_first(
            |cursor| Box::pin(async move { service.list_tasks(cursor.as_deref()).await }),
            |task: &Task| task.content.trim() == query,
        )
        .await;

        match found {
            Ok(Some(task)) => Some(task),
            Ok(None) => {
                debug!(content = %query, "no task with matching content");
                None
            }
            Err(e) => {
                error!(content = %query, error = %e, "failed to search tasks by content");
                None
            }
        }
    }

    /// Find every active task whose content contains `name`,
    /// case-insensitively.
    pub async fn find_tasks_by_name(&self, name: &str) -> Vec<Task> {
        let query = name.trim().to_lowercase();
        let service = &self.service;
        let found = collect_matching(
            |cursor| Box::pin(async move { service.list_tasks(cursor.as_deref()).await }),
            |task: &Task| task.content.trim().to_lowercase().contains(&query),
        )
        .await;

        match found {
            Ok(tasks) => {
                debug!(query = %query, count = tasks.len(), "searched tasks by name");
                tasks
            }
            Err(e) => {
                error!(query = %query, error = %e, "failed to search tasks by name");
                Vec::new()
            }
        }
    }

    /// Replace a task's content.
    pub async fn update_task_content(&self, task_id: &str, content: &str) -> bool {
        match self.service.update_task(task_id, content).await {
            Ok(()) => true,
            Err(e) => {
                error!(task_id = %task_id, error = %e, "failed to update task");
                false
            }
        }
    }

    pub async fn delete_task(&self, task_id: &str) -> bool {
        match self.service.delete_task(task_id).await {
            Ok(()) => true,
            Err(e) => {
                error!(task_id = %task_id, error = %e, "failed to delete task");
                false
            }
        }
    }

    /// Mark a task as completed.
    pub async fn complete_task(&self, task_id: &str) -> bool {
        match self.service.close_task(task_id).await {
            Ok(()) => true,
            Err(e) => {
                error!(task_id = %task_id, error = %e, "failed to complete task");
                false
            }
        }
    }
}
