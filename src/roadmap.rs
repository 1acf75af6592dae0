use std::collections::BTreeMap;

use crate::branches::{branch_labels_by_task, task_with_branches_by_id};
use crate::edges::resolve_edges;
use crate::error::Result;
use crate::graph::GraphBuilder;
use crate::model::{BranchLabel, BranchRow, Task, TaskRow, TaskWithBranches};
use crate::normalize::task_by_id;
use crate::render::{render_nodes, RenderOptions};

/// The derived maps of one render request, computed once up front.
#[derive(Debug, Clone)]
pub struct Roadmap {
    task_by_id: BTreeMap<String, Task>,
    task_with_branches_by_id: BTreeMap<String, TaskWithBranches>,
    branch_labels: BTreeMap<String, Vec<BranchLabel>>,
}

impl Roadmap {
    pub fn build(task_rows: &[TaskRow], branch_rows: &[BranchRow]) -> Result<Self> {
        let task_by_id = task_by_id(task_rows)?;
        let task_with_branches_by_id = task_with_branches_by_id(&task_by_id)?;
        let branch_labels = branch_labels_by_task(branch_rows)?;
        Ok(Self {
            task_by_id,
            task_with_branches_by_id,
            branch_labels,
        })
    }

    pub fn tasks(&self) -> &BTreeMap<String, Task> {
        &self.task_by_id
    }

    pub fn tasks_with_branches(&self) -> &BTreeMap<String, TaskWithBranches> {
        &self.task_with_branches_by_id
    }

    pub fn branch_labels(&self) -> &BTreeMap<String, Vec<BranchLabel>> {
        &self.branch_labels
    }

    /// Feed every node, then every edge, into `graph`.
    pub fn draw<G: GraphBuilder>(&self, mut graph: G, options: &RenderOptions) -> G::Output {
        let nodes = render_nodes(
            &self.task_by_id,
            &self.task_with_branches_by_id,
            &self.branch_labels,
            options,
        );
        for node in nodes {
            graph.add_node(node);
        }
        for edge in resolve_edges(&self.task_by_id, &self.task_with_branches_by_id) {
            graph.add_edge(edge);
        }
        graph.finish()
    }
}

/// Build and draw in one call.
pub fn render<G: GraphBuilder>(
    task_rows: &[TaskRow],
    branch_rows: &[BranchRow],
    graph: G,
    options: &RenderOptions,
) -> Result<G::Output> {
    let roadmap = Roadmap::build(task_rows, branch_rows)?;
    Ok(roadmap.draw(graph, options))
}
