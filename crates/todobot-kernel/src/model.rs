//! Remote entities and request types.
//!
//! These mirror the task service's JSON shapes closely enough to be decoded
//! directly from its responses.  Unknown fields are ignored.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A remote project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// A remote section, always scoped to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub project_id: String,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Due date attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    /// Calendar date (`YYYY-MM-DD`) or datetime as reported by the service.
    pub date: String,
    /// The human phrase the due date was created from, e.g. `"every monday"`.
    #[serde(default)]
    pub string: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

/// A remote task.  This process never holds a durable copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub due: Option<Due>,
    #[serde(default)]
    pub priority: Option<u8>,
}

/// Body of a task creation call.  Absent ids place the task in the
/// service's default location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

/// A task to create, addressed by category *names* rather than ids.
///
/// [`TaskManager::create_task`](crate::tasks::TaskManager::create_task)
/// resolves the names to ids before building a [`NewTask`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub content: String,
    pub project: Option<String>,
    pub section: Option<String>,
    pub due_string: Option<String>,
    pub priority: Option<u8>,
}

impl TaskDraft {
    /// Lowest and highest priority accepted by the service.
    pub const PRIORITY_RANGE: std::ops::RangeInclusive<u8> = 1..=4;

    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set the project by name, or clear it with `None`.
    pub fn with_project(mut self, project: Option<impl Into<String>>) -> Self {
        self.project = project.map(Into::into);
        self
    }

    /// Set the section.  Ignored at creation time unless a project resolves.
    pub fn with_section(mut self, section: Option<impl Into<String>>) -> Self {
        self.section = section.map(Into::into);
        self
    }

    pub fn with_due_string(mut self, due: impl Into<String>) -> Self {
        self.due_string = Some(due.into());
        self
    }

    /// Set the priority, clamped into [`Self::PRIORITY_RANGE`].
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority.clamp(
            *Self::PRIORITY_RANGE.start(),
            *Self::PRIORITY_RANGE.end(),
        ));
        self
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// One page of a remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Cursor for the next page; absent or empty once the listing is
    /// exhausted.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A page with no successor.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
        }
    }

    /// The cursor to request next, if any.
    pub fn next(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}
