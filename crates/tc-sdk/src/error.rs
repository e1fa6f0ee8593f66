use thiserror::Error;

/// Any error raised by the trackchanges crates.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("diff error: {0}")]
    Diff(#[from] tc_diff::DiffError),

    #[error("patch error: {0}")]
    Patch(#[from] tc_diff::PatchError),

    #[error("history error: {0}")]
    Tracked(#[from] tc_history::TrackedError),

    #[error("config error: {0}")]
    Config(#[from] tc_history::ConfigError),

    #[error("base hash mismatch: expected {expected}, found {actual}")]
    BaseMismatch { expected: String, actual: String },
}

pub type SdkResult<T> = Result<T, SdkError>;
