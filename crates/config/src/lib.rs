//! Settings types, snapshot format, and persistence used by hotswitch.

use std::{
    env,
    path::{Path, PathBuf},
};

mod error;
mod modifiers;
mod snapshot;
mod store;

#[cfg(test)]
mod test_snapshot;

pub use error::Error;
pub use modifiers::{ModifierConfig, PrimarySide};
pub use snapshot::{AppRecord, AssignmentRecord, Snapshot};
pub use store::{JsonFileStore, MemoryStore, SettingsStore};

/// Convenient result type for the config crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Determine the preferred settings path (`~/.hotswitch/settings.json`).
pub fn default_settings_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".hotswitch");
    p.push("settings.json");
    p
}

/// Resolve the effective settings path.
///
/// An explicit path always wins. Otherwise the default location is used
/// whether or not it exists yet: a missing file simply loads as defaults.
pub fn resolve_settings_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_settings_path)
}
