//! Get-or-create resolution of remote projects and sections.
//!
//! A category is requested by name.  The reconciler lists the remote
//! categories of that kind, compares every candidate by its sanitized,
//! lower-cased name, and returns the first match in listing order.  On a
//! miss it creates the category under the name exactly as requested.
//!
//! Nothing is cached between calls: every resolution re-queries the service.
//! Creation for one normalized name is serialized within this process, so
//! concurrent requests for the same missing category create it once.  Two
//! separate processes can still race and create duplicates.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::model::{Project, Section};
use crate::pagination::find_first;
use crate::sanitize::comparison_key;
use crate::service::TaskService;

/// Resolves category names to remote ids, creating categories on demand.
pub struct CategoryReconciler {
    service: Arc<dyn TaskService>,
    /// One async mutex per normalized category key.
    creation_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CategoryReconciler {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        Self {
            service,
            creation_locks: DashMap::new(),
        }
    }

    /// Resolve a project name to its remote id, creating the project if no
    /// existing one matches.
    ///
    /// Returns `None` without contacting the service when no name is given,
    /// and `None` after logging when the service fails.  Callers must read
    /// `None` as "could not resolve".
    pub async fn resolve_project(&self, name: Option<&str>) -> Option<String> {
        let name = requested(name)?;
        match self.get_or_create_project(name).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!(project = %name, error = %e, "failed to resolve project");
                None
            }
        }
    }

    /// Resolve a section name inside `project_id`, creating the section if
    /// no existing one matches.
    ///
    /// Both a name and a project id are required; otherwise returns `None`
    /// without contacting the service.
    pub async fn resolve_section(
        &self,
        name: Option<&str>,
        project_id: Option<&str>,
    ) -> Option<String> {
        let name = requested(name)?;
        let project_id = project_id.filter(|id| !id.is_empty())?;
        match self.get_or_create_section(name, project_id).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!(
                    section = %name,
                    project_id = %project_id,
                    error = %e,
                    "failed to resolve section"
                );
                None
            }
        }
    }

    async fn get_or_create_project(&self, name: &str) -> Result<String> {
        let key = comparison_key(name);
        let lock = self.creation_lock(format!("project:{key}"));
        let _guard = lock.lock().await;

        let service = &self.service;
        let existing = find_first(
            |cursor| Box::pin(async move { service.list_projects(cursor.as_deref()).await }),
            |project: &Project| comparison_key(&project.name) == key,
        )
        .await?;

        if let Some(project) = existing {
            debug!(requested = %name, found = %project.name, id = %project.id, "matched existing project");
            return Ok(project.id);
        }

        info!(project = %name, "project not found, creating it");
        let created = self.service.add_project(name).await?;
        Ok(created.id)
    }

    async fn get_or_create_section(&self, name: &str, project_id: &str) -> Result<String> {
        let key = comparison_key(name);
        let lock = self.creation_lock(format!("section:{project_id}:{key}"));
        let _guard = lock.lock().await;

        let service = &self.service;
        let existing = find_first(
            |cursor| {
                Box::pin(async move { service.list_sections(project_id, cursor.as_deref()).await })
            },
            |section: &Section| comparison_key(&section.name) == key,
        )
        .await?;

        if let Some(section) = existing {
            debug!(requested = %name, found = %section.name, id = %section.id, "matched existing section");
            return Ok(section.id);
        }

        info!(section = %name, project_id = %project_id, "section not found in project, creating it");
        let created = self.service.add_section(name, project_id).await?;
        Ok(created.id)
    }

    fn creation_lock(&self, key: String) -> Arc<Mutex<()>> {
        self.creation_locks.entry(key).or_default().clone()
    }
}

/// Treat absent and blank names alike.
fn requested(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.trim().is_empty())
}
