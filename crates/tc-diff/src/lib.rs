//! Structural diff and rollback engine for trackchanges.
//!
//! Computes a path-addressed description of the difference between two
//! versions of a value and rolls a value backwards along that description.
//! Values take part by implementing the capability traits, usually through
//! the [`diffable_record!`] and [`diffable_leaf!`] macros.
//!
//! # Key Types
//!
//! - [`Diffable`] / [`Shape`] -- Resolves a value to object, dynamic object, collection, optional, or leaf
//! - [`DiffableObject`] / [`DynamicDiffable`] -- Field access for records and maps
//! - [`Patchable`] -- Write side used by [`rollback`]
//! - [`diff`] / [`difference`] -- Shape-dispatched structural diff
//! - [`rollback`] / [`rollback_change_set`] / [`rolled_back`] -- Reverse application of changes

pub mod capability;
mod collection;
pub mod dispatch;
pub mod error;
mod impls;
mod macros;
pub mod patch;

#[cfg(test)]
mod fixtures;

pub use capability::{
    capture, decode, Diffable, DiffableObject, DynamicDiffable, Patchable, Shape, Snapshot,
};
pub use dispatch::{diff, difference};
pub use error::{DiffError, DiffResult, PatchError, PatchResult};
pub use patch::{rollback, rollback_change_set, rollback_changes, rolled_back};
pub use serde_json::Value;
