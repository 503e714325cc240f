//! Error types for the tree node layer.

use thiserror::Error;

/// Errors raised by node operations.
///
/// These signal a caller contract violation and are meant to be propagated,
/// not retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Value nodes cannot be opened for child mutation")]
    LeafMutation,

    #[error("Cannot open a mutable node over non-container data")]
    NotAContainer,
}

pub type Result<T> = std::result::Result<T, TreeError>;
