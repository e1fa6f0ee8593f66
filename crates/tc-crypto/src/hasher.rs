use sha1::{Digest, Sha1};
use tc_diff::{capture, DiffError, DiffResult, Diffable, DynamicDiffable, Shape};
use tc_types::{ChangeSet, Fingerprint};

/// Byte fed in place of an absent map entry or empty optional.
pub const ABSENT_SENTINEL: u8 = 0x12;

/// Incremental SHA-1 over the structure of diffable values.
///
/// The walk mirrors the diff dispatcher: objects feed their declared fields
/// in order, dynamic objects feed each key's value in the order the value
/// reports its keys, collections feed their elements in order, optionals feed
/// the wrapped value or [`ABSENT_SENTINEL`], and leaves feed their compact
/// JSON encoding. Field names and map keys are not part of the digest.
#[derive(Default)]
pub struct ContentHasher {
    inner: Sha1,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a value into the digest.
    pub fn update(&mut self, value: &dyn Diffable) -> DiffResult<()> {
        match value.shape() {
            Shape::Object(object) => {
                for key in object.diffable_keys() {
                    self.update(object.value_for_key(key)?)?;
                }
            }
            Shape::Dynamic(map) => self.update_dynamic(map)?,
            Shape::Collection(elements) => {
                for element in elements {
                    self.update(element)?;
                }
            }
            Shape::Optional(Some(inner)) => self.update(inner)?,
            Shape::Optional(None) => self.inner.update([ABSENT_SENTINEL]),
            Shape::Leaf => {
                let bytes = serde_json::to_vec(&capture(value)?)
                    .map_err(|e| DiffError::Snapshot(e.to_string()))?;
                self.inner.update(&bytes);
            }
        }
        Ok(())
    }

    fn update_dynamic(&mut self, map: &dyn DynamicDiffable) -> DiffResult<()> {
        for key in map.diffable_keys() {
            match map.value_for_key(&key) {
                Some(child) => self.update(child)?,
                None => self.inner.update([ABSENT_SENTINEL]),
            }
        }
        Ok(())
    }

    /// Consume the hasher and return the fingerprint.
    pub fn finalize(self) -> Fingerprint {
        let mut digest = [0u8; Fingerprint::LEN];
        digest.copy_from_slice(&self.inner.finalize());
        Fingerprint::from_digest(digest)
    }
}

/// Deterministic, order-sensitive fingerprint of a value.
pub fn fingerprint(value: &dyn Diffable) -> DiffResult<Fingerprint> {
    let mut hasher = ContentHasher::new();
    hasher.update(value)?;
    Ok(hasher.finalize())
}

/// Check that `value` is the state `set` was computed against.
///
/// Nothing in the engine calls this; it is for consumers that want to detect
/// divergence before applying a change set.
pub fn verify_base(set: &ChangeSet, value: &dyn Diffable) -> DiffResult<bool> {
    Ok(fingerprint(value)? == *set.base_hash())
}
