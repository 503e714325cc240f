//! Error types for the versioning layer.

use crate::version::CommitState;
use thiserror::Error;

/// Errors raised by the version commit protocol.
///
/// Every variant is a contract violation by the caller. None of them is
/// retried locally; they propagate to the layer that drives the commit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Commit state mismatch: expected {expected:?}, found {actual:?}")]
    StateMismatch {
        expected: CommitState,
        actual: CommitState,
    },

    #[error("Commit metadata read before commit (state: {0:?})")]
    NotCommitted(CommitState),

    #[error("Plain versions carry no commit metadata")]
    NotTracking,

    #[error("Invalid commit timestamp: {seconds}s + {nanos}ns")]
    InvalidTimestamp { seconds: i64, nanos: u32 },
}

pub type Result<T> = std::result::Result<T, VersionError>;
