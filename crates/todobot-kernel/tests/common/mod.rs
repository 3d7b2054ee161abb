//! In-memory [`TaskService`] that records every call.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use todobot_kernel::{NewTask, Page, Project, Result, Section, ServiceError, Task, TaskService};

pub struct FakeService {
    pub projects: Mutex<Vec<Project>>,
    pub sections: Mutex<Vec<Section>>,
    pub tasks: Mutex<Vec<Task>>,
    page_size: usize,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    next_id: AtomicU32,
}

impl FakeService {
    pub fn new() -> Self {
        Self::with_page_size(50)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            projects: Mutex::new(Vec::new()),
            sections: Mutex::new(Vec::new()),
            tasks: Mutex::new(Vec::new()),
            page_size,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            next_id: AtomicU32::new(1000),
        }
    }

    pub fn project(self, id: &str, name: &str) -> Self {
        self.projects.lock().unwrap().push(Project {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn section(self, id: &str, name: &str, project_id: &str) -> Self {
        self.sections.lock().unwrap().push(Section {
            id: id.into(),
            name: name.into(),
            project_id: project_id.into(),
        });
        self
    }

    pub fn task(self, id: &str, content: &str) -> Self {
        self.tasks.lock().unwrap().push(Task {
            id: id.into(),
            content: content.into(),
            project_id: None,
            section_id: None,
            due: None,
            priority: None,
        });
        self
    }

    /// Make every call to `operation` fail with a transport error.
    pub fn fail_on(self, operation: &'static str) -> Self {
        self.failing.lock().unwrap().insert(operation);
        self
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(ServiceError::Transport {
                operation: operation.to_string(),
                reason: "connection reset".into(),
            });
        }
        Ok(())
    }

    fn fresh_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::SeqCst).to_string()
    }

    fn paginate<T: Clone>(&self, items: &[T], cursor: Option<&str>) -> Page<T> {
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        Page {
            results: items[start..end].to_vec(),
            next_cursor: (end < items.len()).then(|| end.to_string()),
        }
    }
}

#[async_trait]
impl TaskService for FakeService {
    async fn list_projects(&self, cursor: Option<&str>) -> Result<Page<Project>> {
        self.record("list_projects")?;
        let projects = self.projects.lock().unwrap().clone();
        Ok(self.paginate(&projects, cursor))
    }

    async fn add_project(&self, name: &str) -> Result<Project> {
        self.record("add_project")?;
        let project = Project {
            id: self.fresh_id(),
            name: name.into(),
        };
        self.projects.lock().unwrap().push(project.clone());
        Ok(project)
    }

    async fn list_sections(
        &self,
        project_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Section>> {
        self.record("list_sections")?;
        let sections: Vec<Section> = self
            .sections
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        Ok(self.paginate(&sections, cursor))
    }

    async fn add_section(&self, name: &str, project_id: &str) -> Result<Section> {
        self.record("add_section")?;
        let section = Section {
            id: self.fresh_id(),
            name: name.into(),
            project_id: project_id.into(),
        };
        self.sections.lock().unwrap().push(section.clone());
        Ok(section)
    }

    async fn list_tasks(&self, cursor: Option<&str>) -> Result<Page<Task>> {
        self.record("list_tasks")?;
        let tasks = self.tasks.lock().unwrap().clone();
        Ok(self.paginate(&tasks, cursor))
    }

    async fn add_task(&self, task: &NewTask) -> Result<Task> {
        self.record("add_task")?;
        let created = Task {
            id: self.fresh_id(),
            content: task.content.clone(),
            project_id: task.project_id.clone(),
            section_id: task.section_id.clone(),
            due: None,
            priority: task.priority,
        };
        self.tasks.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, task_id: &str, content: &str) -> Result<()> {
        self.record("update_task")?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found(task_id))?;
        task.content = content.into();
        Ok(())
    }

    async fn delete_task(&self, task_id: &str) -> Result<()> {
        self.record("delete_task")?;
        remove(&self.tasks, task_id)
    }

    async fn close_task(&self, task_id: &str) -> Result<()> {
        self.record("close_task")?;
        remove(&self.tasks, task_id)
    }
}

fn remove(tasks: &Mutex<Vec<Task>>, task_id: &str) -> Result<()> {
    let mut tasks = tasks.lock().unwrap();
    let before = tasks.len();
    tasks.retain(|t| t.id != task_id);
    if tasks.len() == before {
        return Err(not_found(task_id));
    }
    Ok(())
}

fn not_found(task_id: &str) -> ServiceError {
    ServiceError::NotFound {
        entity: "task",
        id: task_id.into(),
    }
}
