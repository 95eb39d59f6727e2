//! Durable snapshot format for assignments and scalar settings.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::{Error, ModifierConfig};

/// A persisted application reference.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    /// Stable application identifier, e.g. `com.apple.Safari`.
    pub bundle_identifier: String,
    /// Human-readable name at the time it was recorded.
    pub app_name: String,
}

impl AppRecord {
    /// Convenience constructor.
    pub fn new(bundle_identifier: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            bundle_identifier: bundle_identifier.into(),
            app_name: app_name.into(),
        }
    }
}

/// One key and the apps it cycles through, in cycle order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Single-character key. Stored as a string so bad records can be skipped
    /// individually at load time.
    pub key: String,
    /// Apps in cycle order.
    pub apps: Vec<AppRecord>,
}

/// Everything hotswitch persists.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    /// Key assignments, ordered by key.
    #[serde(deserialize_with = "lenient_vec")]
    pub assignments: Vec<AssignmentRecord>,
    /// Global switch for hotkey handling.
    pub enabled: bool,
    /// Launch an assigned app when it is not running.
    pub relaunch_inactive_apps: bool,
    /// Trigger modifiers.
    pub modifier_config: ModifierConfig,
    /// Apps excluded from auto-assignment.
    #[serde(deserialize_with = "lenient_vec")]
    pub ignored_apps: Vec<AppRecord>,
    /// Register as a login item.
    pub launch_at_login: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            assignments: Vec::new(),
            enabled: true,
            relaunch_inactive_apps: true,
            modifier_config: ModifierConfig::default(),
            ignored_apps: Vec::new(),
            launch_at_login: false,
        }
    }
}

impl Snapshot {
    /// Parse a snapshot from JSON text. `path` is only used for error context.
    pub fn from_json(text: &str, path: Option<&Path>) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::from_json(path, &e))
    }

    /// Render the snapshot as pretty JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Write {
            path: None,
            message: e.to_string(),
        })
    }
}

/// Decode a list, dropping entries that fail to decode instead of failing the
/// whole document.
fn lenient_vec<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(de)?;
    let mut out = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(v) => out.push(v),
            Err(e) => warn!(index, error = %e, "skipping_malformed_record"),
        }
    }
    Ok(out)
}
