//! Error types for graph store operations.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The snapshot breaks a structural invariant and was not loaded.
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// What was wrong with it
        reason: String,
    },

    /// Node id not present in the current snapshot
    #[error("Node not found: {id}")]
    UnknownNode {
        /// The id that was looked up
        id: String,
    },

    /// Edge id not present in the current snapshot
    #[error("Edge not found: {id}")]
    UnknownEdge {
        /// The id that was looked up
        id: String,
    },
}

impl StoreError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            reason: reason.into(),
        }
    }
}
