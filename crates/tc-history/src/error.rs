//! Error types for the history crate.

use tc_diff::{DiffError, PatchError};

/// Errors raised by [`Tracked`](crate::Tracked) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackedError {
    /// No commit is eligible for undo.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The most recent commit is not an undo.
    #[error("nothing to redo")]
    NothingToRedo,

    /// Diffing the new value against the current one failed.
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// Rolling back a change set failed.
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Errors raised while loading a [`HistoryConfig`](crate::HistoryConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid history config: {0}")]
    Parse(String),

    #[error("max_entries must be at least 1")]
    ZeroLimit,
}

/// Convenience alias for history results.
pub type TrackedResult<T> = Result<T, TrackedError>;
