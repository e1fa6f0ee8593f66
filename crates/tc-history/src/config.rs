use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a [`Tracked`](crate::Tracked) history.
///
/// ```toml
/// max_entries = 500
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Keep at most this many commits, discarding the oldest after each
    /// commit. `None` keeps everything.
    pub max_entries: Option<usize>,
}

impl HistoryConfig {
    /// Keep every commit. Same as `Default`.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Keep at most `max_entries` commits (at least one).
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
        }
    }

    /// Parse a config from TOML. Missing fields take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.max_entries == Some(0) {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(config)
    }
}
