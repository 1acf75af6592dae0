use std::collections::BTreeMap;

use log::debug;

use crate::error::{Result, RoadmapError};
use crate::model::{as_graph_id, BranchLabel, BranchRow, Task, TaskWithBranches};
use crate::text::format_record_label;

/// Group branch rows by root task into display labels.
///
/// Labels keep the order in which the source delivered them; rows for the
/// same root need not be contiguous.
pub fn branch_labels_by_task(rows: &[BranchRow]) -> Result<BTreeMap<String, Vec<BranchLabel>>> {
    let mut labels: BTreeMap<String, Vec<BranchLabel>> = BTreeMap::new();
    for (index, row) in rows.iter().enumerate() {
        let missing = |field| RoadmapError::MissingField { row: index, field };
        let root = row.task.as_deref().ok_or_else(|| missing("task"))?;
        let branch = row.branch.as_deref().ok_or_else(|| missing("branch"))?;
        let title = row.title.as_deref().ok_or_else(|| missing("title"))?;

        labels
            .entry(as_graph_id(root))
            .or_default()
            .push(BranchLabel {
                id: as_graph_id(branch),
                title: format_record_label(title),
            });
    }
    Ok(labels)
}

/// Derive every compound task: a task that at least one other task declares
/// itself a branch of. Children follow task map order.
pub fn task_with_branches_by_id(
    task_by_id: &BTreeMap<String, Task>,
) -> Result<BTreeMap<String, TaskWithBranches>> {
    let mut pairs: Vec<(&str, &Task)> = task_by_id
        .values()
        .flat_map(|child| {
            child
                .is_branch_of
                .iter()
                .map(move |parent| (parent.as_str(), child))
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut compound = BTreeMap::new();
    for group in pairs.chunk_by(|a, b| a.0 == b.0) {
        let (parent_id, first_child) = group[0];
        let parent = task_by_id
            .get(parent_id)
            .ok_or_else(|| RoadmapError::UnknownParent {
                parent: parent_id.to_string(),
                branch: first_child.id.clone(),
            })?;

        compound.insert(
            parent_id.to_string(),
            TaskWithBranches {
                task: parent.clone(),
                branches: group.iter().map(|(_, child)| (*child).clone()).collect(),
            },
        );
    }

    debug!(
        "{} of {} tasks have branches",
        compound.len(),
        task_by_id.len()
    );
    Ok(compound)
}
