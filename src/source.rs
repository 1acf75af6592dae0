use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use serde::Deserialize;

use crate::model::{BranchRow, TaskRow};
use crate::ops;

/// Supplies the two row streams a render consumes.
pub trait RecordSource {
    /// Task rows, restricted to the upstream scope of `goal` when given.
    fn task_rows(&self, goal: Option<&str>) -> Result<Vec<TaskRow>>;
    fn branch_rows(&self) -> Result<Vec<BranchRow>>;
}

/// `{"tasks": [...], "branches": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonDocument {
    #[serde(default)]
    pub tasks: Vec<TaskRow>,
    #[serde(default)]
    pub branches: Vec<BranchRow>,
}

impl JsonDocument {
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("invalid roadmap document")
    }
}

/// A JSON document on disk, read afresh on every call.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<JsonDocument> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        JsonDocument::parse(&content).with_context(|| format!("in {}", self.path.display()))
    }
}

impl RecordSource for JsonFile {
    fn task_rows(&self, goal: Option<&str>) -> Result<Vec<TaskRow>> {
        if let Some(goal) = goal {
            bail!("goal '{goal}' given, but JSON input cannot be filtered by goal");
        }
        Ok(self.load()?.tasks)
    }

    fn branch_rows(&self) -> Result<Vec<BranchRow>> {
        Ok(self.load()?.branches)
    }
}

impl RecordSource for Connection {
    fn task_rows(&self, goal: Option<&str>) -> Result<Vec<TaskRow>> {
        ops::task_rows(self, goal)
    }

    fn branch_rows(&self) -> Result<Vec<BranchRow>> {
        ops::branch_rows(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "tasks": [
            {"task": "goal", "title": "Goal"},
            {"task": "prereq", "title": "Prerequisite", "blocks": "goal", "is_bug": true}
        ],
        "branches": [
            {"task": "p", "branch": "x", "title": "X"}
        ]
    }"#;

    #[test]
    fn parse_document() {
        let doc = JsonDocument::parse(DOCUMENT).unwrap();
        assert_eq!(doc.tasks.len(), 2);
        assert_eq!(doc.tasks[1].blocks.as_deref(), Some("goal"));
        assert!(doc.tasks[1].is_bug);
        assert_eq!(doc.branches[0].branch.as_deref(), Some("x"));
    }

    #[test]
    fn branches_are_optional() {
        let doc = JsonDocument::parse(r#"{"tasks": []}"#).unwrap();
        assert!(doc.branches.is_empty());
    }

    #[test]
    fn invalid_document_is_an_error() {
        assert!(JsonDocument::parse("[1, 2]").is_err());
    }

    #[test]
    fn json_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roadmap.json");
        std::fs::write(&path, DOCUMENT).unwrap();

        let source = JsonFile::new(&path);
        assert_eq!(source.task_rows(None).unwrap().len(), 2);
        assert_eq!(source.branch_rows().unwrap().len(), 1);
        assert!(source.task_rows(Some("goal")).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFile::new(dir.path().join("absent.json"));
        let err = source.task_rows(None).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }
}
