use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoadmapError {
    #[error("row {row} is missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("task '{branch}' is a branch of '{parent}', which is not among the tasks")]
    UnknownParent { parent: String, branch: String },
}

pub type Result<T> = std::result::Result<T, RoadmapError>;
