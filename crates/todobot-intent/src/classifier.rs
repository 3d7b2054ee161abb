//! Keyword classification of free text into a project and section.
//!
//! Two passes over the mapping, both in declaration order:
//!
//! 1. **Sections** -- the first section with a keyword contained in the text
//!    wins, together with its project.
//! 2. **Projects** -- otherwise the first project with a keyword contained in
//!    the text wins, filed under [`DEFAULT_SECTION`].
//!
//! With no match the task goes to [`DEFAULT_PROJECT`] without a section.
//! Matching is case-insensitive substring containment, not whole words:
//! the keyword `ai` matches `rain`.

use serde::Serialize;
use tracing::debug;

use todobot_kernel::TaskDraft;

use crate::mapping::MappingConfig;

/// Project used when nothing matches.
pub const DEFAULT_PROJECT: &str = "Inbox";

/// Section used when only a project-level keyword matches.
pub const DEFAULT_SECTION: &str = "General";

/// Where a piece of text should be filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub project: String,
    pub section: Option<String>,
}

impl Classification {
    /// The no-match result: default project, no section.
    pub fn inbox() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            section: None,
        }
    }

    /// Whether this is the no-match result.
    pub fn is_default(&self) -> bool {
        self.project == DEFAULT_PROJECT && self.section.is_none()
    }

    /// Build a creation request for `content` filed under this
    /// classification.  The default project is requested by name like any
    /// other and resolves to the service's own inbox.
    pub fn into_draft(self, content: impl Into<String>) -> TaskDraft {
        TaskDraft::new(content)
            .with_project(Some(self.project))
            .with_section(self.section)
    }
}

/// Classify `text` against `mapping`.
pub fn classify(text: &str, mapping: &MappingConfig) -> Classification {
    let text = text.to_lowercase();

    for (project, entry) in mapping.projects() {
        let Some(sections) = &entry.sections else {
            continue;
        };
        for (section, keywords) in sections {
            if contains_any(&text, keywords) {
                debug!(project, section = %section, "section keyword matched");
                return Classification {
                    project: project.to_string(),
                    section: Some(section.clone()),
                };
            }
        }
    }

    for (project, entry) in mapping.projects() {
        if entry
            .keywords
            .as_deref()
            .is_some_and(|keywords| contains_any(&text, keywords))
        {
            debug!(project, "project keyword matched");
            return Classification {
                project: project.to_string(),
                section: Some(DEFAULT_SECTION.to_string()),
            };
        }
    }

    debug!("no keyword matched, defaulting to {DEFAULT_PROJECT}");
    Classification::inbox()
}

fn contains_any(lowered_text: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| lowered_text.contains(&keyword.to_lowercase()))
}
