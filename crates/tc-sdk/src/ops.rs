//! Convenience operations spanning several crates.

use tc_crypto::fingerprint;
use tc_diff::{Diffable, Patchable};
use tc_history::{HistoryConfig, Tracked};
use tc_types::ChangeSet;
use tracing::warn;

use crate::error::{SdkError, SdkResult};

/// Start tracking `value` with a history config parsed from TOML.
pub fn track_with_toml<V: Patchable + Clone>(value: V, config: &str) -> SdkResult<Tracked<V>> {
    let config = HistoryConfig::from_toml_str(config)?;
    Ok(Tracked::with_config(value, config))
}

/// Fail with [`SdkError::BaseMismatch`] unless `value` is the state `set`
/// was computed against.
pub fn ensure_base(set: &ChangeSet, value: &dyn Diffable) -> SdkResult<()> {
    let actual = fingerprint(value)?;
    if actual == *set.base_hash() {
        return Ok(());
    }
    warn!(
        changeset = %set.id().short_id(),
        expected = %set.base_hash().short_hex(),
        actual = %actual.short_hex(),
        "change set base does not match value"
    );
    Err(SdkError::BaseMismatch {
        expected: set.base_hash().to_hex(),
        actual: actual.to_hex(),
    })
}
