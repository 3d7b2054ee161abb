//! Project/section keyword mapping.
//!
//! The mapping is a JSON document keyed by project name:
//!
//! ```json
//! {
//!   "Work": {
//!     "keywords": ["work", "office"],
//!     "sections": { "Reports": ["report", "summary"] }
//!   }
//! }
//! ```
//!
//! Declaration order of projects and sections decides ties, so both levels
//! are kept in [`IndexMap`]s.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::DEFAULT_PROJECT;
use crate::error::{IntentError, Result};

/// Keyword triggers for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Project-level triggers.  A match files the task under `General`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Section name -> section-level triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<IndexMap<String, Vec<String>>>,
}

/// Ordered mapping from project name to its keyword triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingConfig {
    projects: IndexMap<String, ProjectEntry>,
}

impl MappingConfig {
    /// Parse and validate a mapping from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let mapping: Self = serde_json::from_str(text)?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Read, parse and validate the mapping file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| IntentError::MappingIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mapping = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            projects = mapping.len(),
            "project mapping loaded"
        );
        Ok(mapping)
    }

    /// Iterate projects in declaration order.
    pub fn projects(&self) -> impl Iterator<Item = (&str, &ProjectEntry)> {
        self.projects.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn get(&self, project: &str) -> Option<&ProjectEntry> {
        self.projects.get(project)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Append a project.  Mostly useful for building mappings in code.
    pub fn insert(&mut self, name: impl Into<String>, entry: ProjectEntry) {
        self.projects.insert(name.into(), entry);
    }

    /// The default project may not be configured: a classification that
    /// names it together with a section must never happen.
    fn validate(&self) -> Result<()> {
        if let Some(name) = self
            .projects
            .keys()
            .find(|name| name.trim().eq_ignore_ascii_case(DEFAULT_PROJECT))
        {
            return Err(IntentError::InvalidMapping {
                reason: format!(
                    "project `{name}` collides with the default project; \
                     unmatched tasks already go there"
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"{
        "Work": {
            "keywords": ["work", "office", "meeting"],
            "sections": {
                "Reports": ["report", "analysis", "summary"],
                "General": ["task", "misc"]
            }
        },
        "Personal": {
            "keywords": ["personal", "home", "family"],
            "sections": {
                "Groceries": ["buy", "groceries", "food"],
                "Errands": ["errands", "chores"]
            }
        },
        "Reading": {}
    }"#;

    #[test]
    fn preserves_declaration_order() {
        let mapping = MappingConfig::from_json(SAMPLE).unwrap();
        let names: Vec<&str> = mapping.projects().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Work", "Personal", "Reading"]);

        let personal = mapping.get("Personal").unwrap();
        let sections: Vec<&String> = personal.sections.as_ref().unwrap().keys().collect();
        assert_eq!(sections, vec!["Groceries", "Errands"]);
    }

    #[test]
    fn keywords_and_sections_are_optional() {
        let mapping = MappingConfig::from_json(SAMPLE).unwrap();
        let reading = mapping.get("Reading").unwrap();
        assert!(reading.keywords.is_none());
        assert!(reading.sections.is_none());
    }

    #[test]
    fn default_project_is_rejected() {
        let err = MappingConfig::from_json(r#"{ "inbox": { "keywords": ["x"] } }"#).unwrap_err();
        assert!(matches!(err, IntentError::InvalidMapping { .. }));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = MappingConfig::from_json(r#"{ "Work": { "keywords": "work" } }"#).unwrap_err();
        assert!(matches!(err, IntentError::Json(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let mapping = MappingConfig::load(file.path()).unwrap();
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        let err = MappingConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("projects.json"));
    }
}
