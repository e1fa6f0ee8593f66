//! Error types for the diff crate.

/// Errors that can occur while computing a diff or a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The two sides resolve to different shapes (e.g. object vs leaf).
    #[error("shape mismatch: cannot compare {new} with {old}")]
    ShapeMismatch {
        new: &'static str,
        old: &'static str,
    },

    /// The two sides have the same shape but different concrete types.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An object declared a key it cannot resolve.
    #[error("unknown diffable key `{key}` on {type_name}")]
    UnknownKey { type_name: &'static str, key: String },

    /// A value could not be captured as an immutable snapshot.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Errors that can occur while rolling a change back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// The path walks into a value that has no addressable children.
    #[error("segment `{0}` does not address a patchable value")]
    NotPatchable(String),

    /// The path names a field or element that does not exist.
    #[error("no value at segment `{0}`")]
    MissingField(String),

    /// The action cannot be interpreted against the target's shape.
    #[error("{action} cannot be applied to {target}")]
    InvalidAction {
        action: &'static str,
        target: &'static str,
    },

    /// A path segment could not be parsed (e.g. a non-numeric index).
    #[error("malformed path segment `{0}`")]
    MalformedPath(String),

    /// A collection offset lies outside the collection.
    #[error("offset {offset} out of bounds for collection of length {len}")]
    OffsetOutOfBounds { offset: usize, len: usize },

    /// A stored snapshot could not be decoded into the target type.
    #[error("cannot decode stored value: {0}")]
    Decode(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;

/// Convenience alias for patch results.
pub type PatchResult<T> = Result<T, PatchError>;
