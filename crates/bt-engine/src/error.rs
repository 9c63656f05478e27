use thiserror::Error;

/// Problems with a tree's data, as opposed to the normal `Failure` status of a tick.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tree has no root node")]
    MissingRoot,

    #[error("root node `{0}` does not exist")]
    UnresolvedRoot(String),

    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),

    #[error("node `{node_id}` has unknown type `{node_type}`")]
    UnknownNodeType { node_id: String, node_type: String },

    #[error("connection `{parent_id}` -> `{child_id}` references a missing node")]
    DanglingConnection { parent_id: String, child_id: String },

    #[error("cycle detected through node `{0}`")]
    Cycle(String),

    #[error(
        "node `{node_id}` ({node_type}) has {count} children, expected {min}..={}",
        describe_max(.max)
    )]
    ChildCount {
        node_id: String,
        node_type: String,
        count: usize,
        min: usize,
        max: Option<usize>,
    },
}

fn describe_max(max: &Option<usize>) -> String {
    match max {
        Some(max) => max.to_string(),
        None => "unbounded".to_string(),
    }
}
