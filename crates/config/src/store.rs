//! Persistence adapters for settings snapshots.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use parking_lot::Mutex;
use tracing::debug;

use crate::{Error, Result, Snapshot};

/// Durable storage for settings snapshots.
pub trait SettingsStore: Send + Sync {
    /// Load the stored snapshot. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;
    /// Replace the stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Stores the snapshot as pretty JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`. Nothing is touched until load/save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_err(&self, e: &io::Error) -> Error {
        Error::Write {
            path: Some(self.path.clone()),
            message: e.to_string(),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "settings_file_missing");
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::Read {
                    path: Some(self.path.clone()),
                    message: e.to_string(),
                });
            }
        };
        Snapshot::from_json(&text, Some(&self.path)).map(Some)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json().map_err(|e| match e {
            Error::Write { message, .. } => Error::Write {
                path: Some(self.path.clone()),
                message,
            },
            other => other,
        })?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.write_err(&e))?;
        }
        // Write beside the target and rename so a failed write never clobbers
        // the previous file.
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| self.write_err(&e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ignored = fs::remove_file(&tmp);
            self.write_err(&e)
        })?;
        debug!(path = %self.path.display(), "settings_saved");
        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Snapshot>>,
    saves: AtomicUsize,
    fail: AtomicBool,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let s = Self::new();
        *s.snapshot.lock() = Some(snapshot);
        s
    }

    /// The last saved snapshot.
    pub fn current(&self) -> Option<Snapshot> {
        self.snapshot.lock().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent load/save calls fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Read {
                path: None,
                message: "store unavailable".into(),
            });
        }
        Ok(self.snapshot.lock().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Write {
                path: None,
                message: "store unavailable".into(),
            });
        }
        *self.snapshot.lock() = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
