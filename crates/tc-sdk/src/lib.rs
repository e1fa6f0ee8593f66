//! High-level API for trackchanges.
//!
//! Re-exports the change model, the diff and rollback engine, content
//! fingerprints and the [`Tracked`] history container, so applications only
//! need to depend on this crate.
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use tc_sdk::{diffable_record, Tracked};
//!
//! #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
//! struct Counter { count: i32 }
//!
//! diffable_record!(Counter { count });
//!
//! let mut tracked = Tracked::new(Counter { count: 0 });
//! tracked.set(Counter { count: 1 }, Some("increment"))?;
//! tracked.undo()?;
//! assert_eq!(tracked.wrapped().count, 0);
//! ```

pub mod error;
pub mod ops;

pub use error::{SdkError, SdkResult};
pub use ops::{ensure_base, track_with_toml};

// Re-export key types
pub use tc_crypto::{fingerprint, verify_base, ContentHasher};
pub use tc_diff::{
    decode, diff, difference, diffable_leaf, diffable_record, rollback, rollback_change_set,
    rollback_changes, rolled_back, DiffError, DiffResult, Diffable, DiffableObject,
    DynamicDiffable, PatchError, PatchResult, Patchable, Shape, Snapshot, Value,
};
pub use tc_history::{ConfigError, HistoryConfig, Tracked, TrackedError, TrackedResult};
pub use tc_types::{Action, Change, ChangeSet, ChangeSetId, Commit, Fingerprint, Path, TypeError};
