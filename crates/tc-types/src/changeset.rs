use serde::{Deserialize, Serialize};

use crate::change::Change;
use crate::fingerprint::Fingerprint;
use crate::id::ChangeSetId;

/// An ordered batch of changes produced by one commit.
///
/// Immutable once created: fields are only reachable through accessors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    id: ChangeSetId,
    message: Option<String>,
    /// Fingerprint of the value these changes were computed against.
    base_hash: Fingerprint,
    changes: Vec<Change>,
}

impl ChangeSet {
    /// Create a change set with a fresh id.
    pub fn new(message: Option<String>, base_hash: Fingerprint, changes: Vec<Change>) -> Self {
        Self::with_id(ChangeSetId::new(), message, base_hash, changes)
    }

    pub fn with_id(
        id: ChangeSetId,
        message: Option<String>,
        base_hash: Fingerprint,
        changes: Vec<Change>,
    ) -> Self {
        Self {
            id,
            message,
            base_hash,
            changes,
        }
    }

    pub fn id(&self) -> ChangeSetId {
        self.id
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn base_hash(&self) -> &Fingerprint {
        &self.base_hash
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Returns `true` if the commit did not change anything.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

/// A change set plus an optional back-reference marking it as an undo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    set: ChangeSet,
    /// The change set this commit reverted, if it was produced by an undo.
    undo_of: Option<ChangeSetId>,
}

impl Commit {
    pub fn new(set: ChangeSet, undo_of: Option<ChangeSetId>) -> Self {
        Self { set, undo_of }
    }

    pub fn set(&self) -> &ChangeSet {
        &self.set
    }

    pub fn undo_of(&self) -> Option<ChangeSetId> {
        self.undo_of
    }

    /// Returns `true` if this commit was produced by an undo.
    pub fn is_undo(&self) -> bool {
        self.undo_of.is_some()
    }

    pub fn into_set(self) -> ChangeSet {
        self.set
    }
}
