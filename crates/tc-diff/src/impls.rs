//! Capability implementations for standard library types.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::capability::{decode, Diffable, DynamicDiffable, Patchable, Shape};
use crate::error::{DiffError, DiffResult, PatchError, PatchResult};

crate::diffable_leaf!(
    bool, char, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);

// JSON has no NaN or infinity: serde_json writes them as `null`, which can
// neither be told apart nor decoded back into a float.
macro_rules! finite_float_leaf {
    ($($ty:ty),+) => {
        $(
            impl Diffable for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Leaf
                }

                fn ensure_representable(&self) -> DiffResult<()> {
                    if self.is_finite() {
                        Ok(())
                    } else {
                        Err(DiffError::Snapshot(format!(
                            "{} value {self} has no restorable snapshot",
                            stringify!($ty)
                        )))
                    }
                }
            }

            crate::diffable_leaf!(@patchable $ty);
        )+
    };
}

finite_float_leaf!(f32, f64);

fn parse_index(key: &str) -> PatchResult<usize> {
    key.parse()
        .map_err(|_| PatchError::MalformedPath(key.to_string()))
}

fn absent_into(target: &'static str) -> PatchError {
    PatchError::InvalidAction {
        action: "set absent",
        target,
    }
}

// ---------------------------------------------------------------
// Optional
// ---------------------------------------------------------------

impl<T: Diffable + Serialize> Diffable for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Optional(self.as_ref().map(|v| v as &dyn Diffable))
    }
}

/// Field access passes through to the wrapped value when present.
impl<T: Patchable + Serialize + DeserializeOwned> Patchable for Option<T> {
    fn child_mut(&mut self, key: &str) -> PatchResult<Option<&mut dyn Patchable>> {
        match self {
            Some(inner) => inner.child_mut(key),
            None => Ok(None),
        }
    }

    fn set_value(&mut self, key: &str, value: Option<Value>) -> PatchResult<()> {
        match self {
            Some(inner) => inner.set_value(key, value),
            None => Err(PatchError::MissingField(key.to_string())),
        }
    }

    fn restore(&mut self, value: Option<Value>) -> PatchResult<()> {
        *self = match value {
            Some(value) => Some(decode::<T>(value)?),
            None => None,
        };
        Ok(())
    }

    fn insert_element(&mut self, offset: usize, value: Value) -> PatchResult<()> {
        match self {
            Some(inner) => inner.insert_element(offset, value),
            None => Err(PatchError::MissingField(offset.to_string())),
        }
    }

    fn remove_element(&mut self, offset: usize) -> PatchResult<()> {
        match self {
            Some(inner) => inner.remove_element(offset),
            None => Err(PatchError::MissingField(offset.to_string())),
        }
    }
}

// ---------------------------------------------------------------
// Ordered collections
// ---------------------------------------------------------------

impl<T: Diffable + Serialize> Diffable for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Collection(self.iter().map(|v| v as &dyn Diffable).collect())
    }
}

impl<T: Patchable + Serialize + DeserializeOwned> Patchable for Vec<T> {
    fn child_mut(&mut self, key: &str) -> PatchResult<Option<&mut dyn Patchable>> {
        let index = parse_index(key)?;
        Ok(self.get_mut(index).map(|v| v as &mut dyn Patchable))
    }

    fn set_value(&mut self, key: &str, value: Option<Value>) -> PatchResult<()> {
        let index = parse_index(key)?;
        let len = self.len();
        let slot = self.get_mut(index).ok_or(PatchError::OffsetOutOfBounds {
            offset: index,
            len,
        })?;
        slot.restore(value)
    }

    /// A collection is only ever rolled back element by element.
    fn restore(&mut self, _value: Option<Value>) -> PatchResult<()> {
        Err(PatchError::InvalidAction {
            action: "set",
            target: std::any::type_name::<Self>(),
        })
    }

    fn insert_element(&mut self, offset: usize, value: Value) -> PatchResult<()> {
        if offset > self.len() {
            return Err(PatchError::OffsetOutOfBounds {
                offset,
                len: self.len(),
            });
        }
        self.insert(offset, decode(value)?);
        Ok(())
    }

    fn remove_element(&mut self, offset: usize) -> PatchResult<()> {
        if offset >= self.len() {
            return Err(PatchError::OffsetOutOfBounds {
                offset,
                len: self.len(),
            });
        }
        self.remove(offset);
        Ok(())
    }
}

// ---------------------------------------------------------------
// String-keyed maps
// ---------------------------------------------------------------

impl<V: Diffable + Serialize> Diffable for BTreeMap<String, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Dynamic(self)
    }
}

impl<V: Diffable> DynamicDiffable for BTreeMap<String, V> {
    fn diffable_keys(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn value_for_key(&self, key: &str) -> Option<&dyn Diffable> {
        self.get(key).map(|v| v as &dyn Diffable)
    }
}

impl<V: Patchable + Serialize + DeserializeOwned> Patchable for BTreeMap<String, V> {
    fn child_mut(&mut self, key: &str) -> PatchResult<Option<&mut dyn Patchable>> {
        Ok(self.get_mut(key).map(|v| v as &mut dyn Patchable))
    }

    fn set_value(&mut self, key: &str, value: Option<Value>) -> PatchResult<()> {
        match value {
            Some(value) => {
                self.insert(key.to_string(), decode(value)?);
            }
            None => {
                self.remove(key);
            }
        }
        Ok(())
    }

    fn restore(&mut self, value: Option<Value>) -> PatchResult<()> {
        let value = value.ok_or_else(|| absent_into(std::any::type_name::<Self>()))?;
        *self = decode(value)?;
        Ok(())
    }
}

impl<V: Diffable + Serialize> Diffable for HashMap<String, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Dynamic(self)
    }
}

/// Keys are reported sorted so diffs and fingerprints do not depend on the
/// hasher's iteration order.
impl<V: Diffable> DynamicDiffable for HashMap<String, V> {
    fn diffable_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn value_for_key(&self, key: &str) -> Option<&dyn Diffable> {
        self.get(key).map(|v| v as &dyn Diffable)
    }
}

impl<V: Patchable + Serialize + DeserializeOwned> Patchable for HashMap<String, V> {
    fn child_mut(&mut self, key: &str) -> PatchResult<Option<&mut dyn Patchable>> {
        Ok(self.get_mut(key).map(|v| v as &mut dyn Patchable))
    }

    fn set_value(&mut self, key: &str, value: Option<Value>) -> PatchResult<()> {
        match value {
            Some(value) => {
                self.insert(key.to_string(), decode(value)?);
            }
            None => {
                self.remove(key);
            }
        }
        Ok(())
    }

    fn restore(&mut self, value: Option<Value>) -> PatchResult<()> {
        let value = value.ok_or_else(|| absent_into(std::any::type_name::<Self>()))?;
        *self = decode(value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaf_restore_decodes_snapshot() {
        let mut value = 42i64;
        value.restore(Some(json!(7))).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn leaf_rejects_absent_marker() {
        let mut value = String::from("x");
        let err = value.restore(None).unwrap_err();
        assert!(matches!(err, PatchError::InvalidAction { action: "set absent", .. }));
    }

    #[test]
    fn leaf_rejects_wrong_type() {
        let mut value = 1u8;
        assert!(matches!(
            value.restore(Some(json!("one"))),
            Err(PatchError::Decode(_))
        ));
    }

    #[test]
    fn leaf_has_no_children() {
        let mut value = true;
        assert_eq!(
            value.child_mut("x").err(),
            Some(PatchError::NotPatchable("x".into()))
        );
    }

    #[test]
    fn option_restore_handles_absent_marker() {
        let mut value = Some(3i32);
        value.restore(None).unwrap();
        assert_eq!(value, None);
        value.restore(Some(json!(5))).unwrap();
        assert_eq!(value, Some(5));
    }

    #[test]
    fn vec_insert_and_remove_elements() {
        let mut value = vec![1i32, 3];
        value.insert_element(1, json!(2)).unwrap();
        assert_eq!(value, vec![1, 2, 3]);
        value.remove_element(0).unwrap();
        assert_eq!(value, vec![2, 3]);
    }

    #[test]
    fn vec_offsets_are_bounds_checked() {
        let mut value = vec![1i32];
        assert_eq!(
            value.insert_element(3, json!(0)),
            Err(PatchError::OffsetOutOfBounds { offset: 3, len: 1 })
        );
        assert_eq!(
            value.remove_element(1),
            Err(PatchError::OffsetOutOfBounds { offset: 1, len: 1 })
        );
    }

    #[test]
    fn vec_rejects_whole_replacement() {
        let mut value = vec![1i32, 2];
        assert!(matches!(
            value.restore(Some(json!([3]))),
            Err(PatchError::InvalidAction { action: "set", .. })
        ));
    }

    #[test]
    fn vec_index_must_be_numeric() {
        let mut value = vec![1i32, 2];
        assert_eq!(
            value.child_mut("first").err(),
            Some(PatchError::MalformedPath("first".into()))
        );
        value.set_value("1", Some(json!(9))).unwrap();
        assert_eq!(value, vec![1, 9]);
    }

    #[test]
    fn map_set_value_inserts_and_removes() {
        let mut value: BTreeMap<String, String> = BTreeMap::new();
        value.set_value("a", Some(json!("aa"))).unwrap();
        assert_eq!(value.get("a").map(String::as_str), Some("aa"));
        value.set_value("a", None).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn hash_map_keys_are_sorted() {
        let value: HashMap<String, i32> =
            [("c", 3), ("a", 1), ("b", 2)].into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(value.diffable_keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn map_missing_key_is_absent_child() {
        let mut value: HashMap<String, i32> = HashMap::new();
        assert!(value.child_mut("nope").unwrap().is_none());
    }

    #[test]
    fn nested_option_restores_inner_none() {
        let mut value: Option<Option<String>> = None;
        value.restore(Some(Value::Null)).unwrap();
        assert_eq!(value, Some(None));
        value.restore(None).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn float_leaves_must_be_finite() {
        assert!(1.25f64.ensure_representable().is_ok());
        assert!(matches!(
            f64::NAN.ensure_representable(),
            Err(DiffError::Snapshot(_))
        ));
        assert!(matches!(
            f32::INFINITY.ensure_representable(),
            Err(DiffError::Snapshot(_))
        ));
    }
}
