//! Atomic edits addressed by path.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Ordered sequence of segments locating a value inside a value graph.
///
/// Segments are field names, dictionary keys, or collection indices rendered
/// in decimal. The empty path denotes the value itself.
pub type Path = Vec<String>;

/// What happened at a path, stored in the form needed to undo it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// The value at the path was replaced. `from` is the value to restore on
    /// rollback; `None` is the absent marker (the key or optional did not
    /// exist before). The marker is encoded by omitting `from`, so a
    /// recorded JSON `null` stays distinct from it.
    Set {
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "present"
        )]
        from: Option<Value>,
    },
    /// An element was added to the collection at the path.
    Insert { offset: usize },
    /// An element was removed from the collection at the path.
    Remove { offset: usize, value: Value },
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl Action {
    /// Returns `true` for `Insert` and `Remove`.
    pub fn is_membership(&self) -> bool {
        matches!(self, Self::Insert { .. } | Self::Remove { .. })
    }
}

/// One atomic edit at a specific path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub path: Path,
    pub action: Action,
}

impl Change {
    pub fn new<I, S>(path: I, action: Action) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            action,
        }
    }

    /// A change addressing the value itself.
    pub fn at_root(action: Action) -> Self {
        Self {
            path: Vec::new(),
            action,
        }
    }

    /// `Set` with a recorded prior value.
    pub fn set<I, S>(path: I, from: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(path, Action::Set { from: Some(from) })
    }

    /// `Set` whose prior state was absent.
    pub fn set_absent<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(path, Action::Set { from: None })
    }

    pub fn insert<I, S>(path: I, offset: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(path, Action::Insert { offset })
    }

    pub fn remove<I, S>(path: I, offset: usize, value: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(path, Action::Remove { offset, value })
    }

    /// Prefix the path with one more segment, moving the change one level up
    /// the value graph.
    pub fn pullback(mut self, prefix: impl Into<String>) -> Self {
        self.path.insert(0, prefix.into());
        self
    }

    /// Returns `true` if this change edits collection membership.
    pub fn is_membership(&self) -> bool {
        self.action.is_membership()
    }
}
