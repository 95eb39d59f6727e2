use std::collections::BTreeMap;

use config::AppRecord;

use crate::AppRef;

/// Apps that auto-assignment must skip.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IgnoredApps {
    apps: BTreeMap<String, AppRef>,
}

impl IgnoredApps {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an app. Returns false when it was already present.
    pub fn insert(&mut self, app: AppRef) -> bool {
        if self.apps.contains_key(&app.bundle_id) {
            return false;
        }
        self.apps.insert(app.bundle_id.clone(), app);
        true
    }

    /// Remove an app by bundle id. Returns false when it was not present.
    pub fn remove(&mut self, bundle_id: &str) -> bool {
        self.apps.remove(bundle_id).is_some()
    }

    /// True if the bundle id is ignored.
    pub fn contains(&self, bundle_id: &str) -> bool {
        self.apps.contains_key(bundle_id)
    }

    /// Ignored apps ordered by bundle id.
    pub fn iter(&self) -> impl Iterator<Item = &AppRef> {
        self.apps.values()
    }

    /// Number of ignored apps.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// True when nothing is ignored.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Build from persisted records. Later duplicates are dropped.
    pub fn from_records(records: &[AppRecord]) -> Self {
        let mut out = Self::new();
        for r in records {
            if !r.bundle_identifier.is_empty() {
                out.insert(AppRef::from(r.clone()));
            }
        }
        out
    }

    /// Persisted form.
    pub fn to_records(&self) -> Vec<AppRecord> {
        self.apps.values().map(AppRecord::from).collect()
    }
}
