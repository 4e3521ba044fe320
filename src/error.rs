//! Error types for anchormark.

use crate::document::NodeId;
use std::fmt;

/// Result type alias for anchormark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for anchormark operations.
///
/// Structural errors (`InvalidInput`) are fatal to the call that raised them
/// and are reported before any document mutation. Per-node errors
/// (`MutationFailure`) are isolated by batch operations: the engine logs them
/// and continues with the remaining work.
#[derive(Debug)]
pub enum Error {
    /// Request payload is malformed (e.g. snippet list is not an array).
    InvalidInput(String),
    /// A node could not be wrapped or unwrapped (detached, missing parent,
    /// or not the kind of node the operation expects).
    MutationFailure { node: NodeId, reason: String },
}

impl Error {
    /// Stable machine-readable classification, used in host responses.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::MutationFailure { .. } => "mutation_failure",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::MutationFailure { node, reason } => {
                write!(f, "mutation failed for node {node}: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}
