//! Change model for trackchanges.
//!
//! This crate provides the immutable records produced by diffing and consumed
//! by rollback and history. Every other trackchanges crate depends on
//! `tc-types`.
//!
//! # Key Types
//!
//! - [`Change`] / [`Action`] -- One atomic edit at a [`Path`]
//! - [`ChangeSet`] -- An ordered batch of changes anchored to a base [`Fingerprint`]
//! - [`Commit`] -- A change set plus an optional undo back-reference
//! - [`ChangeSetId`] -- UUID v7 change set identifier

pub mod change;
pub mod changeset;
pub mod error;
pub mod fingerprint;
pub mod id;

pub use change::{Action, Change, Path};
pub use changeset::{ChangeSet, Commit};
pub use error::TypeError;
pub use fingerprint::Fingerprint;
pub use id::ChangeSetId;
