//! Turn flat task and branch records into a left-to-right dependency diagram.
//!
//! Tasks that other tasks declare themselves branches of become table nodes
//! with one addressable row per branch; edges into a branch land on that row.

pub mod branches;
pub mod db;
pub mod edges;
pub mod error;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod ops;
pub mod render;
pub mod roadmap;
pub mod source;
pub mod text;
pub mod validate;
pub mod watch;

pub use error::RoadmapError;
pub use graph::{DotGraph, GraphBuilder, GraphSpec};
pub use model::{BranchRow, Task, TaskRow, TaskWithBranches};
pub use render::{RenderOptions, Style};
pub use roadmap::Roadmap;
pub use source::{JsonDocument, JsonFile, RecordSource};
