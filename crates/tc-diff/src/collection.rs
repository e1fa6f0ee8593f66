//! Identity-aware diff of ordered collections.
//!
//! Elements are matched with a longest-common-subsequence run from the
//! `similar` crate. The match yields the offsets present only in the new
//! collection (insertions) and only in the old one (removals); a walk over
//! both sequences then turns them into `Insert`/`Remove` changes and recurses
//! into matched pairs.
//!
//! Offsets are positions in the collection as it stands when the change is
//! rolled back (changes are rolled back in reverse order), so both `Insert`
//! and `Remove` carry the walk position in the new collection.

use std::collections::BTreeSet;

use serde_json::Value;
use similar::algorithms::{lcs, DiffHook};
use tc_types::{Action, Change};
use tracing::trace;

use crate::capability::{capture, Diffable};
use crate::error::{DiffError, DiffResult};

/// Comparison key of one element.
enum Token {
    /// Matched by identity key.
    Identity(Value),
    /// Matched by content equality.
    Content(Value),
    /// Never equal to anything.
    Opaque,
}

impl Token {
    fn of(element: &dyn Diffable) -> Self {
        if let Some(id) = element.identity() {
            return Self::Identity(id);
        }
        match capture(element) {
            Ok(value) => Self::Content(value),
            Err(_) => Self::Opaque,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Identity(a), Self::Identity(b)) => a == b,
            (Self::Content(a), Self::Content(b)) => a == b,
            _ => false,
        }
    }
}

/// Collects the unmatched offsets reported by the LCS run.
#[derive(Default)]
struct Offsets {
    insertions: BTreeSet<usize>,
    removals: BTreeSet<usize>,
}

impl DiffHook for Offsets {
    type Error = DiffError;

    fn delete(&mut self, old_index: usize, old_len: usize, _new_index: usize) -> DiffResult<()> {
        self.removals.extend(old_index..old_index + old_len);
        Ok(())
    }

    fn insert(&mut self, _old_index: usize, new_index: usize, new_len: usize) -> DiffResult<()> {
        self.insertions.extend(new_index..new_index + new_len);
        Ok(())
    }
}

/// Diff two collections of the same element type.
pub(crate) fn diff_collections(
    new: &[&dyn Diffable],
    old: &[&dyn Diffable],
) -> DiffResult<Vec<Change>> {
    let new_tokens: Vec<Token> = new.iter().map(|e| Token::of(*e)).collect();
    let old_tokens: Vec<Token> = old.iter().map(|e| Token::of(*e)).collect();

    let mut offsets = Offsets::default();
    lcs::diff(
        &mut offsets,
        &old_tokens[..],
        0..old_tokens.len(),
        &new_tokens[..],
        0..new_tokens.len(),
    )?;

    let mut changes = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < new.len() || j < old.len() {
        let inserted = offsets.insertions.contains(&i);
        let removed = offsets.removals.contains(&j);

        match (inserted, removed) {
            (false, false) => {
                let (Some(new_element), Some(old_element)) = (new.get(i), old.get(j)) else {
                    break;
                };
                changes.extend(
                    crate::dispatch::diff(*new_element, *old_element)?
                        .into_iter()
                        .map(|c| c.pullback(i.to_string())),
                );
                i += 1;
                j += 1;
            }
            (true, true) => {
                changes.push(removal(old, i, j)?);
                changes.push(Change::at_root(Action::Insert { offset: i }));
                i += 1;
                j += 1;
            }
            (false, true) => {
                changes.push(removal(old, i, j)?);
                j += 1;
            }
            (true, false) => {
                changes.push(Change::at_root(Action::Insert { offset: i }));
                i += 1;
            }
        }
    }

    trace!(
        new_len = new.len(),
        old_len = old.len(),
        insertions = offsets.insertions.len(),
        removals = offsets.removals.len(),
        changes = changes.len(),
        "collection diff"
    );
    Ok(changes)
}

/// `Remove` of the old element `j`, addressed at walk position `i`.
fn removal(old: &[&dyn Diffable], i: usize, j: usize) -> DiffResult<Change> {
    let value = match old.get(j) {
        Some(element) => capture(*element)?,
        None => return Err(DiffError::Snapshot(format!("no element at offset {j}"))),
    };
    Ok(Change::at_root(Action::Remove { offset: i, value }))
}
