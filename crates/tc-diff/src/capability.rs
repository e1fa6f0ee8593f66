//! Capability traits a value implements to take part in diffing and rollback.
//!
//! Every participating value implements [`Diffable`], which resolves the
//! value to exactly one [`Shape`]. Record-like values expose their fields
//! through [`DiffableObject`], map-like values through [`DynamicDiffable`].
//! [`Patchable`] adds the write side used by rollback.
//!
//! Values must be acyclic. Owned Rust values are acyclic by construction; a
//! shape implementation that hands out shared back-references would make
//! diffing and fingerprinting recurse forever.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DiffError, DiffResult, PatchError, PatchResult};

/// Capture of a value as an immutable, serializable leaf snapshot.
///
/// Implemented for every `Serialize` type. Snapshots are what `Set` and
/// `Remove` actions store for restoration.
pub trait Snapshot {
    fn snapshot(&self) -> DiffResult<Value>;
}

impl<T: Serialize> Snapshot for T {
    fn snapshot(&self) -> DiffResult<Value> {
        serde_json::to_value(self).map_err(|e| DiffError::Snapshot(e.to_string()))
    }
}

/// The shape a value presents to the diff dispatcher.
pub enum Shape<'a> {
    /// Record with a fixed, type-level field list.
    Object(&'a dyn DiffableObject),
    /// Map-like value whose key set varies per instance.
    Dynamic(&'a dyn DynamicDiffable),
    /// Ordered collection of elements.
    Collection(Vec<&'a dyn Diffable>),
    /// Optional value, present or absent.
    Optional(Option<&'a dyn Diffable>),
    /// Equatable scalar compared through its snapshot.
    Leaf,
}

impl Shape<'_> {
    /// Human-readable name of the shape, used in errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Dynamic(_) => "dynamic object",
            Self::Collection(_) => "collection",
            Self::Optional(_) => "optional",
            Self::Leaf => "leaf",
        }
    }
}

/// A value that can be compared structurally.
pub trait Diffable: Snapshot {
    /// Resolve the value to its shape.
    fn shape(&self) -> Shape<'_>;

    /// Identity key used to match collection elements across versions.
    ///
    /// Elements without an identity are matched by content equality.
    fn identity(&self) -> Option<Value> {
        None
    }

    /// Concrete type name, compared to detect type mismatches.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Fail if this leaf's snapshot would not restore to an equal value.
    ///
    /// Only consulted for [`Shape::Leaf`] values.
    fn ensure_representable(&self) -> DiffResult<()> {
        Ok(())
    }
}

/// Snapshot a diffable value, rejecting leaves that cannot be restored.
///
/// Every snapshot the engine records goes through here, so a change is never
/// stored that rollback could not apply.
pub fn capture(value: &dyn Diffable) -> DiffResult<Value> {
    check_representable(value)?;
    value.snapshot()
}

fn check_representable(value: &dyn Diffable) -> DiffResult<()> {
    match value.shape() {
        Shape::Object(object) => object
            .diffable_keys()
            .iter()
            .try_for_each(|key| check_representable(object.value_for_key(key)?)),
        Shape::Dynamic(map) => map
            .diffable_keys()
            .iter()
            .filter_map(|key| map.value_for_key(key))
            .try_for_each(check_representable),
        Shape::Collection(elements) => elements.into_iter().try_for_each(check_representable),
        Shape::Optional(inner) => inner.map_or(Ok(()), check_representable),
        Shape::Leaf => value.ensure_representable(),
    }
}

/// Record-like value with a stable, ordered list of fields.
pub trait DiffableObject {
    /// The declared field names, in diff order.
    fn diffable_keys(&self) -> &'static [&'static str];

    /// The value of a declared field.
    fn value_for_key(&self, key: &str) -> DiffResult<&dyn Diffable>;
}

/// Map-like value whose keys are known only per instance.
pub trait DynamicDiffable {
    /// Keys currently present.
    fn diffable_keys(&self) -> Vec<String>;

    /// The value stored under `key`, or `None` if the key is absent.
    fn value_for_key(&self, key: &str) -> Option<&dyn Diffable>;
}

/// A value that rollback can write into.
pub trait Patchable: Diffable {
    /// Mutable access to the child addressed by `key`.
    ///
    /// `Ok(None)` means the key is valid for this value but nothing is stored
    /// under it (an absent map entry or an empty optional).
    fn child_mut(&mut self, key: &str) -> PatchResult<Option<&mut dyn Patchable>>;

    /// Write a recovered value into the field `key`. `None` is the absent
    /// marker: maps drop the key, optionals become empty.
    fn set_value(&mut self, key: &str, value: Option<Value>) -> PatchResult<()>;

    /// Replace the whole value with a recovered snapshot.
    fn restore(&mut self, value: Option<Value>) -> PatchResult<()>;

    /// Re-insert an element removed from this collection.
    fn insert_element(&mut self, offset: usize, value: Value) -> PatchResult<()> {
        let _ = (offset, value);
        Err(PatchError::InvalidAction {
            action: "remove",
            target: self.type_name(),
        })
    }

    /// Take out an element inserted into this collection.
    fn remove_element(&mut self, offset: usize) -> PatchResult<()> {
        let _ = offset;
        Err(PatchError::InvalidAction {
            action: "insert",
            target: self.type_name(),
        })
    }
}

/// Decode a stored snapshot back into a concrete type.
pub fn decode<T: DeserializeOwned>(value: Value) -> PatchResult<T> {
    serde_json::from_value(value).map_err(|e| PatchError::Decode(e.to_string()))
}
