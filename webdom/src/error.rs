//! DOM error types.

use thiserror::Error;

use crate::node::NodeId;

/// Errors returned by fallible tree and query operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node handle does not belong to this document (or was never created).
    #[error("Node {0:?} does not exist in this document")]
    UnknownNode(NodeId),

    /// A selector string could not be parsed.
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    /// Inserting the child would make it an ancestor of itself.
    #[error("Cannot insert {child:?} under {parent:?}: node would contain itself")]
    HierarchyRequest {
        /// The requested parent.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },
}

/// Result alias for DOM operations.
pub type Result<T> = std::result::Result<T, DomError>;
