use std::collections::BTreeSet;

use serde::Deserialize;

const FOCUSED_COLOR: &str = "#730FC3";
const BUG_COLOR: &str = "#AC6363";
const DEFAULT_BACKGROUND: &str = "#788897";
const DEFAULT_PEN: &str = "#4B5D6C";

/// One row of the primary task stream. A task with several edges arrives as
/// several rows, each carrying at most one `blocks` and one `is_branch_of`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskRow {
    pub task: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub is_bug: bool,
    #[serde(default)]
    pub is_focused: bool,
    #[serde(default)]
    pub blocks: Option<String>,
    #[serde(default)]
    pub is_branch_of: Option<String>,
}

/// One row of the secondary branch stream: `branch` is an alternative of `task`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BranchRow {
    pub task: Option<String>,
    pub branch: Option<String>,
    pub title: Option<String>,
}

/// Display text for one branch row of a compound node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchLabel {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub is_bug: bool,
    pub is_focused: bool,
    pub blocks: BTreeSet<String>,
    pub is_branch_of: BTreeSet<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_bug: false,
            is_focused: false,
            blocks: BTreeSet::new(),
            is_branch_of: BTreeSet::new(),
        }
    }

    /// Focus wins over bug.
    pub fn background_color(&self) -> &'static str {
        if self.is_focused {
            FOCUSED_COLOR
        } else if self.is_bug {
            BUG_COLOR
        } else {
            DEFAULT_BACKGROUND
        }
    }

    pub fn pen_color(&self) -> &'static str {
        if self.is_focused {
            FOCUSED_COLOR
        } else if self.is_bug {
            BUG_COLOR
        } else {
            DEFAULT_PEN
        }
    }

    /// The parent whose compound node holds this task's row, if any.
    /// With several parents the smallest id wins.
    pub fn branch_parent(&self) -> Option<&str> {
        self.is_branch_of.iter().next().map(String::as_str)
    }
}

/// A task split into alternative sub-paths, drawn as a table node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskWithBranches {
    pub task: Task,
    pub branches: Vec<Task>,
}

/// Graph ids cannot contain `:`, DOT uses it to separate node id and port.
pub fn as_graph_id(source: &str) -> String {
    source.replace(':', "_")
}
