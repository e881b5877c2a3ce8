//! Widget construction errors.

use thiserror::Error;
use webdom::{DomError, NodeId};

/// Errors raised while building widgets. Interaction never fails; disabled
/// widgets report `false` from their operations instead.
#[derive(Debug, Error)]
pub enum StrapError {
    /// A DOM operation failed (usually an unknown node handle).
    #[error(transparent)]
    Dom(#[from] DomError),

    /// The `data-strap-props` attribute of a node is not valid options JSON.
    #[error("Invalid options on {node:?}: {source}")]
    InvalidOptions {
        /// Node carrying the attribute.
        node: NodeId,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for widget operations.
pub type Result<T> = std::result::Result<T, StrapError>;
