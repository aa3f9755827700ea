//! Error types for the mirrored tree

use crate::id::NodeId;
use thiserror::Error;

/// Structural or attachment failure. The tree is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// An index or count falls outside the children list. `move` also reports
    /// this when `from < to < from + count`: the run cannot be placed before
    /// one of its own members, so there is no meaningful result.
    #[error("{op} out of range: index {index}, count {count}, target {target:?}, len {len}")]
    OutOfRange {
        op: &'static str,
        index: usize,
        count: usize,
        target: Option<usize>,
        len: usize,
    },

    #[error("Node {0} is already attached to a parent")]
    AlreadyAttached(NodeId),

    #[error("Inserting node {0} would create a cycle")]
    CycleDetected(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0} is not text")]
    NotText(NodeId),

    #[error("Node {0} belongs to a different document")]
    ForeignNode(NodeId),

    #[error("No async runtime available to run event observers")]
    NoRuntime,
}

/// Failure to hand an inbound payload to a node's observer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Node {0} has no registered observer")]
    NotRegistered(NodeId),

    #[error("Observer for node {0} has shut down")]
    Closed(NodeId),

    #[error("Inbound channel for node {0} is full")]
    Full(NodeId),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type TreeResult<T> = Result<T, TreeError>;
