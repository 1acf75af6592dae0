use std::collections::BTreeMap;

use log::debug;

use crate::graph::{Compass, EdgeSpec, Endpoint};
use crate::model::{Task, TaskWithBranches};

pub const EDGE_COLOR: &str = "#4B5D6C";
pub const EDGE_PEN_WIDTH: &str = "2.5";

pub const XOR_PORT: &str = "xor";
pub const TITLE_PORT: &str = "title";

/// Where an edge into `blocked` lands: the blocked task's row inside its
/// parent's table, else the shared `xor` port of a compound task, else the
/// node boundary. Always entering from the west.
pub fn destination(
    blocked: &Task,
    task_with_branches_by_id: &BTreeMap<String, TaskWithBranches>,
) -> Endpoint {
    if let Some(parent) = blocked.branch_parent() {
        Endpoint::port(parent, blocked.id.as_str(), Compass::West)
    } else if task_with_branches_by_id.contains_key(&blocked.id) {
        Endpoint::port(blocked.id.as_str(), XOR_PORT, Compass::West)
    } else {
        Endpoint::boundary(blocked.id.as_str(), Compass::West)
    }
}

/// Edges leave a compound task from its title row, other tasks from the
/// east boundary.
pub fn source(
    blocker: &Task,
    task_with_branches_by_id: &BTreeMap<String, TaskWithBranches>,
) -> Endpoint {
    if task_with_branches_by_id.contains_key(&blocker.id) {
        Endpoint::port(blocker.id.as_str(), TITLE_PORT, Compass::East)
    } else {
        Endpoint::boundary(blocker.id.as_str(), Compass::East)
    }
}

/// One edge per (blocker, blocked) pair whose blocked task is known.
/// Unknown targets are skipped.
pub fn resolve_edges(
    task_by_id: &BTreeMap<String, Task>,
    task_with_branches_by_id: &BTreeMap<String, TaskWithBranches>,
) -> Vec<EdgeSpec> {
    let mut edges = Vec::new();
    for task in task_by_id.values() {
        for blocked_id in &task.blocks {
            let Some(blocked) = task_by_id.get(blocked_id) else {
                debug!("skipping edge {} -> {blocked_id}: unknown task", task.id);
                continue;
            };

            edges.push(EdgeSpec {
                tail: source(task, task_with_branches_by_id),
                head: destination(blocked, task_with_branches_by_id),
                color: EDGE_COLOR,
                pen_width: EDGE_PEN_WIDTH,
            });
        }
    }
    debug!("resolved {} edges", edges.len());
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branches::task_with_branches_by_id;
    use crate::graph::Anchor;

    fn make_task(id: &str, blocks: &[&str], branch_of: &[&str]) -> Task {
        let mut task = Task::new(id, id.to_uppercase());
        task.blocks = blocks.iter().map(|b| b.to_string()).collect();
        task.is_branch_of = branch_of.iter().map(|p| p.to_string()).collect();
        task
    }

    fn resolve(tasks: Vec<Task>) -> Vec<EdgeSpec> {
        let tasks: BTreeMap<String, Task> = tasks.into_iter().map(|t| (t.id.clone(), t)).collect();
        let compound = task_with_branches_by_id(&tasks).unwrap();
        resolve_edges(&tasks, &compound)
    }

    #[test]
    fn plain_to_plain() {
        let edges = resolve(vec![make_task("a", &[], &[]), make_task("b", &["a"], &[])]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].tail, Endpoint::boundary("b", Compass::East));
        assert_eq!(edges[0].head, Endpoint::boundary("a", Compass::West));
        assert_eq!(edges[0].color, "#4B5D6C");
        assert_eq!(edges[0].pen_width, "2.5");
    }

    #[test]
    fn into_branch_targets_parent_row() {
        let edges = resolve(vec![
            make_task("p", &[], &[]),
            make_task("x", &[], &["p"]),
            make_task("y", &[], &["p"]),
            make_task("q", &["x"], &[]),
        ]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].head, Endpoint::port("p", "x", Compass::West));
        assert_eq!(edges[0].head.side(), None);
        assert_eq!(edges[0].tail, Endpoint::boundary("q", Compass::East));
    }

    #[test]
    fn into_compound_targets_xor() {
        let edges = resolve(vec![
            make_task("m", &[], &[]),
            make_task("b1", &[], &["m"]),
            make_task("n", &["m"], &[]),
        ]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].head, Endpoint::port("m", "xor", Compass::West));
    }

    #[test]
    fn branch_row_wins_over_xor() {
        // c is compound and also a branch of p
        let edges = resolve(vec![
            make_task("p", &[], &[]),
            make_task("c", &[], &["p"]),
            make_task("d", &[], &["c"]),
            make_task("n", &["c"], &[]),
        ]);
        assert_eq!(edges[0].head, Endpoint::port("p", "c", Compass::West));
    }

    #[test]
    fn from_compound_leaves_title() {
        let edges = resolve(vec![
            make_task("m", &["z"], &[]),
            make_task("b1", &[], &["m"]),
            make_task("z", &[], &[]),
        ]);
        assert_eq!(edges[0].tail, Endpoint::port("m", "title", Compass::East));
        assert_eq!(edges[0].head, Endpoint::boundary("z", Compass::West));
    }

    #[test]
    fn unknown_target_is_skipped() {
        let edges = resolve(vec![
            make_task("a", &[], &[]),
            make_task("b", &["a", "ghost"], &[]),
            make_task("c", &["a"], &[]),
        ]);
        assert_eq!(edges.len(), 2);
        assert!(edges
            .iter()
            .all(|e| e.head == Endpoint::boundary("a", Compass::West)));
    }

    #[test]
    fn multiple_parents_pick_smallest_id() {
        let edges = resolve(vec![
            make_task("p2", &[], &[]),
            make_task("p1", &[], &[]),
            make_task("x", &[], &["p2", "p1"]),
            make_task("q", &["x"], &[]),
        ]);
        match &edges[0].head.anchor {
            Anchor::Port { name, .. } => assert_eq!(name, "x"),
            Anchor::Boundary(_) => panic!("expected a port"),
        }
        assert_eq!(edges[0].head.node, "p1");
    }
}
