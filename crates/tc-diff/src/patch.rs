//! Rollback: applying recorded changes backwards.
//!
//! A change is rolled back by walking its path down the target value. A
//! one-segment `Set` is written through the parent's setter so map keys and
//! optionals can appear or disappear; everything else descends to the value
//! the path names and edits it in place.

use tc_types::{Action, Change, ChangeSet};
use tracing::trace;

use crate::capability::Patchable;
use crate::error::{PatchError, PatchResult};

/// Roll back a single change in place.
///
/// On error the target may be partially modified; use [`rolled_back`] to
/// work on a copy.
pub fn rollback(target: &mut dyn Patchable, change: &Change) -> PatchResult<()> {
    trace!(path = ?change.path, action = ?change.action, "rollback");
    rollback_at(target, &change.path, &change.action)
}

/// Roll back a list of changes, last change first.
pub fn rollback_changes(target: &mut dyn Patchable, changes: &[Change]) -> PatchResult<()> {
    changes
        .iter()
        .rev()
        .try_for_each(|change| rollback(target, change))
}

/// Roll back every change of a change set, last change first.
pub fn rollback_change_set(target: &mut dyn Patchable, set: &ChangeSet) -> PatchResult<()> {
    rollback_changes(target, set.changes())
}

/// Roll back `changes` on a copy of `value`, leaving `value` untouched.
pub fn rolled_back<T: Patchable + Clone>(value: &T, changes: &[Change]) -> PatchResult<T> {
    let mut copy = value.clone();
    rollback_changes(&mut copy, changes)?;
    Ok(copy)
}

fn rollback_at(target: &mut dyn Patchable, path: &[String], action: &Action) -> PatchResult<()> {
    match (path, action) {
        ([], Action::Set { from }) => target.restore(from.clone()),
        ([], Action::Insert { offset }) => target.remove_element(*offset),
        ([], Action::Remove { offset, value }) => target.insert_element(*offset, value.clone()),
        ([key], Action::Set { from }) => target.set_value(key, from.clone()),
        ([key, rest @ ..], _) => {
            let child = target
                .child_mut(key)?
                .ok_or_else(|| PatchError::MissingField(key.clone()))?;
            rollback_at(child, rest, action)
        }
    }
}
