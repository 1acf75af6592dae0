//! Declarative node and edge descriptions and the builders that consume them.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A filled rounded rectangle.
    Plain,
    /// A table with a title row and one row per branch.
    Compound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// HTML-like markup, emitted between angle brackets.
    Html(String),
    /// Plain or record text, emitted as a quoted string.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub id: String,
    pub kind: NodeKind,
    pub label: Label,
    pub attrs: Vec<(&'static str, String)>,
}

impl NodeSpec {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    East,
    West,
}

impl Compass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::East => "e",
            Self::West => "w",
        }
    }
}

/// Where an edge attaches to a node. A named port carries its own compass
/// point, so it never comes with a separate side attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    Boundary(Compass),
    Port { name: String, compass: Compass },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub node: String,
    pub anchor: Anchor,
}

impl Endpoint {
    pub fn boundary(node: impl Into<String>, compass: Compass) -> Self {
        Self {
            node: node.into(),
            anchor: Anchor::Boundary(compass),
        }
    }

    pub fn port(node: impl Into<String>, name: impl Into<String>, compass: Compass) -> Self {
        Self {
            node: node.into(),
            anchor: Anchor::Port {
                name: name.into(),
                compass,
            },
        }
    }

    /// The side attribute value, only set for boundary anchors.
    pub fn side(&self) -> Option<Compass> {
        match self.anchor {
            Anchor::Boundary(compass) => Some(compass),
            Anchor::Port { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpec {
    pub tail: Endpoint,
    pub head: Endpoint,
    pub color: &'static str,
    pub pen_width: &'static str,
}

/// Receives nodes and edges of one diagram and produces the finished graph.
pub trait GraphBuilder {
    type Output;

    fn add_node(&mut self, node: NodeSpec);
    fn add_edge(&mut self, edge: EdgeSpec);
    fn finish(self) -> Self::Output;
}

/// Keeps the descriptions as they were emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSpec {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
}

impl GraphSpec {
    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

impl GraphBuilder for GraphSpec {
    type Output = Self;

    fn add_node(&mut self, node: NodeSpec) {
        self.nodes.push(node);
    }

    fn add_edge(&mut self, edge: EdgeSpec) {
        self.edges.push(edge);
    }

    fn finish(self) -> Self {
        self
    }
}

/// Writes Graphviz DOT source, laid out left to right.
#[derive(Debug, Clone)]
pub struct DotGraph {
    out: String,
}

impl Default for DotGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DotGraph {
    pub fn new() -> Self {
        let mut out = String::new();
        out.push_str("digraph roadmap {\n");
        out.push_str("  graph [rankdir=\"LR\", forcelabels=\"true\"];\n");
        Self { out }
    }
}

impl GraphBuilder for DotGraph {
    type Output = String;

    fn add_node(&mut self, node: NodeSpec) {
        let label = match &node.label {
            Label::Html(markup) => format!("<{markup}>"),
            Label::Text(text) => quote_label(text),
        };
        let _ = write!(self.out, "  {} [label={label}", quote(&node.id));
        for (key, value) in &node.attrs {
            let _ = write!(self.out, ", {key}={}", quote(value));
        }
        self.out.push_str("];\n");
    }

    fn add_edge(&mut self, edge: EdgeSpec) {
        let _ = write!(
            self.out,
            "  {} -> {} [color={}, penwidth={}",
            endpoint(&edge.tail),
            endpoint(&edge.head),
            quote(edge.color),
            quote(edge.pen_width),
        );
        if let Some(side) = edge.head.side() {
            let _ = write!(self.out, ", headport={}", side.as_str());
        }
        if let Some(side) = edge.tail.side() {
            let _ = write!(self.out, ", tailport={}", side.as_str());
        }
        self.out.push_str("];\n");
    }

    fn finish(mut self) -> String {
        self.out.push_str("}\n");
        self.out
    }
}

/// DOT quoted string for ids, ports and attribute values.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Text labels carry their own `\n` and record escapes, so only quotes are
/// escaped here.
fn quote_label(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

fn endpoint(endpoint: &Endpoint) -> String {
    match &endpoint.anchor {
        Anchor::Boundary(_) => quote(&endpoint.node),
        Anchor::Port { name, compass } => {
            format!("{}:{}:{}", quote(&endpoint.node), quote(name), compass.as_str())
        }
    }
}
