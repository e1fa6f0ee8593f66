//! Undo/redo history for trackchanges.
//!
//! [`Tracked`] wraps a value and records every change to it as a
//! [`Commit`](tc_types::Commit), newest first. Undo appends a commit that
//! reverts an earlier change set; redo collapses the most recent undo.
//!
//! # Key Types
//!
//! - [`Tracked`] -- Value plus linear history with `change`/`set`/`undo`/`redo`
//! - [`HistoryConfig`] -- Optional history length limit, loadable from TOML
//! - [`TrackedError`] / [`ConfigError`] -- Failure modes

pub mod config;
pub mod error;
pub mod tracked;

pub use config::HistoryConfig;
pub use error::{ConfigError, TrackedError, TrackedResult};
pub use tracked::Tracked;
