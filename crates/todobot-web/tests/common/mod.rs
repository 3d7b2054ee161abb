//! Shared fixtures: an in-memory task service and a sample mapping.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use todobot_intent::MappingConfig;
use todobot_kernel::{NewTask, Page, Project, Result, Section, ServiceError, Task, TaskService};

pub const MAPPING: &str = r#"{
    "Work": {
        "keywords": ["work", "office", "meeting"],
        "sections": { "Reports": ["report", "summary"] }
    },
    "AI Automations": {
        "keywords": ["ai", "automation"],
        "sections": { "Farming-guide": ["farming"] }
    }
}"#;

pub fn mapping() -> MappingConfig {
    MappingConfig::from_json(MAPPING).unwrap()
}

/// Single-page in-memory Todoist.  `offline()` makes every call fail.
#[derive(Default)]
pub struct MemoryTodoist {
    pub projects: Mutex<Vec<Project>>,
    pub sections: Mutex<Vec<Section>>,
    pub tasks: Mutex<Vec<Task>>,
    offline: AtomicBool,
    next_id: AtomicU32,
}

impl MemoryTodoist {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(100),
            ..Self::default()
        }
        .project("inbox", "Inbox")
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
            project_id: Some("inbox".into()),
            section_id: None,
            due: None,
            priority: None,
        });
        self
    }

    pub fn offline(self) -> Self {
        self.offline.store(true, Ordering::SeqCst);
        self
    }

    pub fn project_names(&self) -> Vec<String> {
        self.projects.lock().unwrap().iter().map(|p| p.name.clone()).collect()
    }

    pub fn section_names(&self) -> Vec<String> {
        self.sections.lock().unwrap().iter().map(|s| s.name.clone()).collect()
    }

    pub fn task_by_content(&self, content: &str) -> Option<Task> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.content == content)
            .cloned()
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport {
                operation: operation.into(),
                reason: "connection refused".into(),
            });
        }
        Ok(())
    }

    fn fresh_id(&self) -> String {
        format!("id{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl TaskService for MemoryTodoist {
    async fn list_projects(&self, _cursor: Option<&str>) -> Result<Page<Project>> {
        self.check("list_projects")?;
        Ok(Page::last(self.projects.lock().unwrap().clone()))
    }

    async fn add_project(&self, name: &str) -> Result<Project> {
        self.check("add_project")?;
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
        _cursor: Option<&str>,
    ) -> Result<Page<Section>> {
        self.check("list_sections")?;
        let sections = self
            .sections
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        Ok(Page::last(sections))
    }

    async fn add_section(&self, name: &str, project_id: &str) -> Result<Section> {
        self.check("add_section")?;
        let section = Section {
            id: self.fresh_id(),
            name: name.into(),
            project_id: project_id.into(),
        };
        self.sections.lock().unwrap().push(section.clone());
        Ok(section)
    }

    async fn list_tasks(&self, _cursor: Option<&str>) -> Result<Page<Task>> {
        self.check("list_tasks")?;
        Ok(Page::last(self.tasks.lock().unwrap().clone()))
    }

    async fn add_task(&self, task: &NewTask) -> Result<Task> {
        self.check("add_task")?;
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
        self.check("update_task")?;
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.content = content.into();
                Ok(())
            }
            None => Err(ServiceError::NotFound {
                entity: "task",
                id: task_id.into(),
            }),
        }
    }

    async fn delete_task(&self, task_id: &str) -> Result<()> {
        self.check("delete_task")?;
        self.tasks.lock().unwrap().retain(|t| t.id != task_id);
        Ok(())
    }

    async fn close_task(&self, task_id: &str) -> Result<()> {
        self.check("close_task")?;
        self.tasks.lock().unwrap().retain(|t| t.id != task_id);
        Ok(())
    }
}
