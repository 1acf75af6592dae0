use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::{Result, RoadmapError};
use crate::model::{as_graph_id, Task, TaskRow};

/// Collapse the task row stream into one `Task` per distinct task id.
///
/// Rows are stably sorted by source id before grouping, so the title comes
/// from the first row delivered for each task. Presence markers are set if
/// any row of the group carries them; edge targets are unioned.
pub fn task_by_id(rows: &[TaskRow]) -> Result<BTreeMap<String, Task>> {
    let mut keyed = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let task = row.task.as_deref().ok_or(RoadmapError::MissingField {
            row: index,
            field: "task",
        })?;
        let title = row.title.as_deref().ok_or(RoadmapError::MissingField {
            row: index,
            field: "title",
        })?;
        keyed.push((task, title, row));
    }
    keyed.sort_by(|a, b| a.0.cmp(b.0));

    let mut tasks: BTreeMap<String, Task> = BTreeMap::new();
    for group in keyed.chunk_by(|a, b| a.0 == b.0) {
        let (source_id, title, _) = group[0];
        let mut task = Task::new(as_graph_id(source_id), title);
        for (_, _, row) in group {
            task.is_bug |= row.is_bug;
            task.is_focused |= row.is_focused;
            if let Some(blocked) = &row.blocks {
                task.blocks.insert(as_graph_id(blocked));
            }
            if let Some(parent) = &row.is_branch_of {
                task.is_branch_of.insert(as_graph_id(parent));
            }
        }

        if let Some(previous) = tasks.insert(task.id.clone(), task) {
            warn!(
                "task '{source_id}' maps to graph id '{}' already used by another task; keeping the later one",
                previous.id
            );
        }
    }

    debug!("normalized {} rows into {} tasks", rows.len(), tasks.len());
    Ok(tasks)
}
