use std::collections::BTreeMap;

use log::debug;

use crate::graph::{Label, NodeKind, NodeSpec};
use crate::model::{BranchLabel, Task, TaskWithBranches};
use crate::text::{
    escape_backslashes, escape_html, format_record_label, wrap_html, wrap_text, Align,
};

pub const DEFAULT_WRAP_WIDTH: usize = 20;

const XOR_GLYPH: &str = "⊻";
const FONT_NAME: &str = "Arial";
const FONT_COLOR: &str = "white";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// HTML-like labels; compound nodes are tables.
    Html,
    /// Plain text labels; compound nodes are records.
    Record,
}

impl Style {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "html" => Ok(Self::Html),
            "record" => Ok(Self::Record),
            _ => anyhow::bail!("invalid style '{s}': must be html or record"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub style: Style,
    pub wrap_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            style: Style::Html,
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

/// Build the node list: compound tasks first, then plain tasks.
/// Tasks that are only branches of another task get no node of their own.
pub fn render_nodes(
    task_by_id: &BTreeMap<String, Task>,
    task_with_branches_by_id: &BTreeMap<String, TaskWithBranches>,
    branch_labels: &BTreeMap<String, Vec<BranchLabel>>,
    options: &RenderOptions,
) -> Vec<NodeSpec> {
    let mut nodes: Vec<NodeSpec> = task_with_branches_by_id
        .values()
        .map(|task| {
            let labels = branch_labels
                .get(&task.task.id)
                .map_or(&[][..], Vec::as_slice);
            compound_node(task, labels, options)
        })
        .collect();
    let compound_count = nodes.len();

    nodes.extend(
        task_by_id
            .values()
            .filter(|task| {
                !task_with_branches_by_id.contains_key(&task.id) && task.is_branch_of.is_empty()
            })
            .map(|task| plain_node(task, options)),
    );

    debug!(
        "rendered {} compound and {} plain nodes",
        compound_count,
        nodes.len() - compound_count
    );
    nodes
}

pub fn plain_node(task: &Task, options: &RenderOptions) -> NodeSpec {
    let label = match options.style {
        Style::Html => Label::Html(format!(
            "<b>{}</b>",
            wrap_html(&task.title, Align::Center, options.wrap_width)
        )),
        Style::Record => Label::Text(wrap_text(
            &task.title,
            options.wrap_width,
            escape_backslashes,
        )),
    };

    NodeSpec {
        id: task.id.clone(),
        kind: NodeKind::Plain,
        label,
        attrs: vec![
            ("shape", "rect".to_string()),
            ("style", "filled,rounded".to_string()),
            ("fontcolor", FONT_COLOR.to_string()),
            ("fontname", FONT_NAME.to_string()),
            ("fillcolor", task.background_color().to_string()),
            ("color", task.pen_color().to_string()),
            ("margin", "0.3".to_string()),
        ],
    }
}

/// A task with branches. `labels` is only consulted in record style.
pub fn compound_node(
    task: &TaskWithBranches,
    labels: &[BranchLabel],
    options: &RenderOptions,
) -> NodeSpec {
    let parent = &task.task;
    match options.style {
        Style::Html => NodeSpec {
            id: parent.id.clone(),
            kind: NodeKind::Compound,
            label: Label::Html(table_markup(task, options.wrap_width)),
            attrs: vec![
                ("shape", "none".to_string()),
                ("fontcolor", FONT_COLOR.to_string()),
                ("fontname", FONT_NAME.to_string()),
                ("color", parent.pen_color().to_string()),
            ],
        },
        Style::Record => NodeSpec {
            id: parent.id.clone(),
            kind: NodeKind::Compound,
            label: Label::Text(record_markup(task, labels, options.wrap_width)),
            attrs: vec![
                ("shape", "Mrecord".to_string()),
                ("style", "filled".to_string()),
                ("fontcolor", FONT_COLOR.to_string()),
                ("fontname", FONT_NAME.to_string()),
                ("fillcolor", parent.background_color().to_string()),
                ("color", parent.pen_color().to_string()),
            ],
        },
    }
}

/// Title row with the `xor` and `title` ports, then one row per branch
/// addressed by the branch id. Every branch row but the last is bordered
/// top and bottom.
fn table_markup(task: &TaskWithBranches, width: usize) -> String {
    let parent = &task.task;
    let mut markup = format!(
        "<table border=\"1\" cellborder=\"0\" cellpadding=\"15\" cellspacing=\"0\" \
         style=\"rounded\" bgcolor=\"{}\">",
        parent.background_color()
    );
    markup.push_str(&format!(
        "<tr><td port=\"xor\"><font point-size=\"24\"><b>{XOR_GLYPH}</b></font></td>\
         <td port=\"title\" align=\"left\"><b>{}</b></td></tr>",
        wrap_html(&parent.title, Align::Left, width)
    ));

    let last = task.branches.len().saturating_sub(1);
    for (index, branch) in task.branches.iter().enumerate() {
        let border = if index < last { 1 } else { 0 };
        markup.push_str(&format!(
            "<tr><td border=\"{border}\" sides=\"tb\" port=\"{}\" colspan=\"2\">{}</td></tr>",
            escape_html(&branch.id),
            wrap_html(&branch.title, Align::Center, width)
        ));
    }

    markup.push_str("</table>");
    markup
}

fn record_markup(task: &TaskWithBranches, labels: &[BranchLabel], width: usize) -> String {
    let mut fields = vec![format!(
        "{{<xor> {XOR_GLYPH}|<title> {}}}",
        wrap_text(&task.task.title, width, format_record_label)
    )];

    for branch in &task.branches {
        let text = match labels.iter().find(|label| label.id == branch.id) {
            // Lookup labels arrive already escaped.
            Some(label) => wrap_text(&label.title, width, str::to_owned),
            None => wrap_text(&branch.title, width, format_record_label),
        };
        fields.push(format!("<{}> {text}", format_record_label(&branch.id)));
    }

    fields.join("|")
}
