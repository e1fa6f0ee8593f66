//! Structural diff dispatcher.
//!
//! [`diff`] resolves both sides to their [`Shape`] and routes to the matching
//! strategy: field-by-field for objects, LCS for collections, key-by-key for
//! dynamic objects, unwrap-or-replace for optionals, and snapshot comparison
//! for leaves. The result describes how to get from `old` to `new` in the
//! form needed to roll `new` back to `old`.

use tc_types::{Action, Change};

use crate::capability::{capture, Diffable, DiffableObject, DynamicDiffable, Shape};
use crate::collection::diff_collections;
use crate::error::{DiffError, DiffResult};

/// Compute the changes that turn `old` into `new`.
///
/// Fails with [`DiffError`] if the two sides do not share a shape and type,
/// or if a value cannot be snapshotted. No partial result is returned.
pub fn diff(new: &dyn Diffable, old: &dyn Diffable) -> DiffResult<Vec<Change>> {
    match (new.shape(), old.shape()) {
        (Shape::Object(new_object), Shape::Object(old_object)) => {
            ensure_same_type(new, old)?;
            diff_objects(new_object, old_object)
        }
        (Shape::Collection(new_elements), Shape::Collection(old_elements)) => {
            ensure_same_type(new, old)?;
            diff_collections(&new_elements, &old_elements)
        }
        (Shape::Dynamic(new_map), Shape::Dynamic(old_map)) => {
            ensure_same_type(new, old)?;
            diff_dynamic(new_map, old_map)
        }
        (Shape::Optional(new_inner), Shape::Optional(old_inner)) => {
            ensure_same_type(new, old)?;
            diff_optionals(new_inner, old_inner)
        }
        (Shape::Leaf, Shape::Leaf) => {
            ensure_same_type(new, old)?;
            diff_leaves(new, old)
        }
        (new_shape, old_shape) => Err(DiffError::ShapeMismatch {
            new: new_shape.kind(),
            old: old_shape.kind(),
        }),
    }
}

/// Typed entry point: the changes that turn `old` into `new`.
pub fn difference<T: Diffable>(new: &T, old: &T) -> DiffResult<Vec<Change>> {
    diff(new, old)
}

fn ensure_same_type(new: &dyn Diffable, old: &dyn Diffable) -> DiffResult<()> {
    if new.type_name() == old.type_name() {
        Ok(())
    } else {
        Err(DiffError::TypeMismatch {
            expected: old.type_name(),
            actual: new.type_name(),
        })
    }
}

fn diff_objects(new: &dyn DiffableObject, old: &dyn DiffableObject) -> DiffResult<Vec<Change>> {
    let mut changes = Vec::new();
    for key in new.diffable_keys() {
        let new_value = new.value_for_key(key)?;
        let old_value = old.value_for_key(key)?;
        changes.extend(
            diff(new_value, old_value)?
                .into_iter()
                .map(|c| c.pullback(*key)),
        );
    }
    Ok(changes)
}

fn diff_dynamic(new: &dyn DynamicDiffable, old: &dyn DynamicDiffable) -> DiffResult<Vec<Change>> {
    let mut changes = Vec::new();

    // Removed keys: restoring the snapshot reinserts them.
    for key in old.diffable_keys() {
        if new.value_for_key(&key).is_some() {
            continue;
        }
        if let Some(old_value) = old.value_for_key(&key) {
            changes.push(Change::set([key], capture(old_value)?));
        }
    }

    // Inserted and changed keys.
    for key in new.diffable_keys() {
        let Some(new_value) = new.value_for_key(&key) else {
            continue;
        };
        match old.value_for_key(&key) {
            Some(old_value) => changes.extend(
                diff(new_value, old_value)?
                    .into_iter()
                    .map(|c| c.pullback(key.clone())),
            ),
            None => changes.push(Change::set_absent([key])),
        }
    }

    // Stable sort: changes sharing a path keep their relative order, and a
    // collection's membership changes stay ahead of its element changes.
    changes.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(changes)
}

fn diff_optionals(
    new: Option<&dyn Diffable>,
    old: Option<&dyn Diffable>,
) -> DiffResult<Vec<Change>> {
    match (new, old) {
        // An empty inner optional snapshots to `null`, which only restores
        // correctly as a whole value, never as the absent marker.
        (Some(new), Some(old)) if matches!(old.shape(), Shape::Optional(_)) => {
            diff_leaves(new, old)
        }
        (Some(new), Some(old)) => diff(new, old),
        (None, None) => Ok(Vec::new()),
        (_, Some(old)) => Ok(vec![Change::at_root(Action::Set {
            from: Some(capture(old)?),
        })]),
        (Some(_), None) => Ok(vec![Change::at_root(Action::Set { from: None })]),
    }
}

fn diff_leaves(new: &dyn Diffable, old: &dyn Diffable) -> DiffResult<Vec<Change>> {
    let old_snapshot = capture(old)?;
    if capture(new)? == old_snapshot {
        Ok(Vec::new())
    } else {
        Ok(vec![Change::at_root(Action::Set {
            from: Some(old_snapshot),
        })])
    }
}
