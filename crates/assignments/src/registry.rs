use std::collections::{BTreeMap, HashMap};

use config::AssignmentRecord;
use tracing::{debug, trace, warn};

use crate::{AppRef, IgnoredApps};

/// Normalize a key character: lowercase, and reject whitespace and control
/// characters. Characters whose lowercase form is more than one char are
/// rejected as well.
pub fn normalize_key(c: char) -> Option<char> {
    if c.is_whitespace() || c.is_control() {
        return None;
    }
    let mut lower = c.to_lowercase();
    let k = lower.next()?;
    if lower.next().is_some() {
        return None;
    }
    Some(k)
}

/// Key → apps assignments with per-key cycling.
///
/// Invariants, upheld by every method:
/// - no key maps to an empty list;
/// - a bundle id appears in at most one list, and `by_bundle` points at it;
/// - a key's cursor, when present, is a valid index into its list.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    /// Forward map, ordered by key for stable listings and snapshots.
    assignments: BTreeMap<char, Vec<AppRef>>,
    /// Reverse index.
    by_bundle: HashMap<String, char>,
    /// Index of the app that activates next. Absent means 0.
    cursors: HashMap<char, usize>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records.
    ///
    /// A record with an empty or multi-character key, or with no apps, is
    /// skipped with a warning; the rest still load. Apps are re-assigned in
    /// order, so an app listed under two keys ends up on the later one.
    pub fn from_records(records: &[AssignmentRecord]) -> Self {
        let mut reg = Self::new();
        for rec in records {
            let mut chars = rec.key.chars();
            let key = match (chars.next(), chars.next()) {
                (Some(c), None) => normalize_key(c),
                _ => None,
            };
            let Some(key) = key else {
                warn!(key = %rec.key, "skipping_record_with_invalid_key");
                continue;
            };
            if rec.apps.is_empty() {
                warn!(%key, "skipping_record_without_apps");
                continue;
            }
            for app in &rec.apps {
                if app.bundle_identifier.is_empty() {
                    warn!(%key, "skipping_app_without_bundle_id");
                    continue;
                }
                reg.assign(key, &app.bundle_identifier, &app.app_name);
            }
        }
        reg
    }

    /// Persisted form, ordered by key. Cycle positions are not persisted.
    pub fn to_records(&self) -> Vec<AssignmentRecord> {
        self.assignments
            .iter()
            .map(|(k, apps)| AssignmentRecord {
                key: k.to_string(),
                apps: apps.iter().map(Into::into).collect(),
            })
            .collect()
    }

    /// Assign an app to `key`, appending it to the key's cycle.
    ///
    /// If the app currently lives on a different key it is moved. Assigning an
    /// app to the key it already has is a no-op. Returns true on change.
    pub fn assign(&mut self, key: char, bundle_id: &str, name: &str) -> bool {
        let Some(key) = normalize_key(key) else {
            debug!(?key, "assign_ignored_invalid_key");
            return false;
        };
        if bundle_id.is_empty() {
            return false;
        }
        match self.by_bundle.get(bundle_id).copied() {
            Some(current) if current == key => {
                trace!(%key, bundle_id, "assign_noop_already_present");
                return false;
            }
            Some(current) => {
                debug!(from = %current, to = %key, bundle_id, "reassigning_app");
                self.detach(bundle_id, current);
            }
            None => {}
        }
        let apps = self.assignments.entry(key).or_default();
        apps.push(AppRef::new(bundle_id, name));
        let len = apps.len();
        self.by_bundle.insert(bundle_id.to_string(), key);
        self.clamp_cursor(key, len);
        debug!(%key, bundle_id, name, count = len, "assigned");
        true
    }

    /// Remove `key` and every app on it.
    pub fn remove_assignment(&mut self, key: char) -> bool {
        let Some(key) = normalize_key(key) else {
            return false;
        };
        let Some(apps) = self.assignments.remove(&key) else {
            return false;
        };
        for app in &apps {
            self.by_bundle.remove(&app.bundle_id);
        }
        self.cursors.remove(&key);
        debug!(%key, count = apps.len(), "assignment_removed");
        true
    }

    /// Remove one app from `key`. The key disappears when its last app goes.
    pub fn remove_app(&mut self, bundle_id: &str, key: char) -> bool {
        let Some(key) = normalize_key(key) else {
            return false;
        };
        if self.by_bundle.get(bundle_id) != Some(&key) {
            return false;
        }
        self.detach(bundle_id, key);
        debug!(%key, bundle_id, "app_removed");
        true
    }

    /// Remove an app from whichever key holds it.
    pub fn remove_bundle(&mut self, bundle_id: &str) -> bool {
        match self.key_for(bundle_id) {
            Some(key) => self.remove_app(bundle_id, key),
            None => false,
        }
    }

    /// Return the app to activate for `key` and advance the key's cycle.
    ///
    /// Repeated calls visit the key's apps in assignment order and wrap. A
    /// single-app key keeps its cursor at zero.
    pub fn next_bundle_id(&mut self, key: char) -> Option<String> {
        let key = normalize_key(key)?;
        let apps = self.assignments.get(&key)?;
        let count = apps.len();
        let cursor = self.cursors.get(&key).copied().unwrap_or(0).min(count - 1);
        let id = apps[cursor].bundle_id.clone();
        if count > 1 {
            self.cursors.insert(key, (cursor + 1) % count);
        }
        trace!(%key, cursor, count, bundle_id = %id, "next_bundle_id");
        Some(id)
    }

    /// Bundle ids on `key`, in cycle order.
    pub fn bundle_ids(&self, key: char) -> Vec<String> {
        self.apps(key)
            .iter()
            .map(|a| a.bundle_id.clone())
            .collect()
    }

    /// Apps on `key`, in cycle order. Empty when unassigned.
    pub fn apps(&self, key: char) -> &[AppRef] {
        normalize_key(key)
            .and_then(|k| self.assignments.get(&k))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The key holding `bundle_id`.
    pub fn key_for(&self, bundle_id: &str) -> Option<char> {
        self.by_bundle.get(bundle_id).copied()
    }

    /// Current cycle cursor for `key`, or None when unassigned.
    pub fn cursor(&self, key: char) -> Option<usize> {
        let key = normalize_key(key)?;
        self.assignments
            .contains_key(&key)
            .then(|| self.cursors.get(&key).copied().unwrap_or(0))
    }

    /// Assign each candidate by the first letter of its name.
    ///
    /// Candidates that are already assigned or ignored are skipped, as are
    /// names with no ASCII letter. Apps sharing an initial all join that key's
    /// cycle. Returns the number of apps assigned.
    pub fn auto_assign<'a>(
        &mut self,
        candidates: impl IntoIterator<Item = &'a AppRef>,
        ignored: &IgnoredApps,
    ) -> usize {
        let mut assigned = 0;
        for app in candidates {
            if self.by_bundle.contains_key(&app.bundle_id) || ignored.contains(&app.bundle_id) {
                continue;
            }
            let Some(key) = app.initial() else {
                trace!(name = %app.name, "auto_assign_no_initial");
                continue;
            };
            if self.assign(key, &app.bundle_id, &app.name) {
                assigned += 1;
            }
        }
        if assigned > 0 {
            debug!(assigned, "auto_assigned");
        }
        assigned
    }

    /// Suggest a key for an app with display name `name`.
    ///
    /// The name's initial is suggested even when that key is taken, since a
    /// key can hold several apps. Names without a letter get the first letter
    /// that has no assignment.
    pub fn suggest_key(&self, name: &str) -> Option<char> {
        name.chars()
            .find(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .or_else(|| ('a'..='z').find(|k| !self.assignments.contains_key(k)))
    }

    /// Assigned keys in order.
    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.assignments.keys().copied()
    }

    /// `(key, apps)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &[AppRef])> {
        self.assignments.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Number of assigned keys.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// True when nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Verify the forward map, reverse index, and cursors agree.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        let mut seen = 0;
        for (key, apps) in &self.assignments {
            if apps.is_empty() {
                return Err(format!("key {key} has an empty list"));
            }
            for app in apps {
                seen += 1;
                if self.by_bundle.get(&app.bundle_id) != Some(key) {
                    return Err(format!("reverse index wrong for {}", app.bundle_id));
                }
            }
            if let Some(cur) = self.cursors.get(key)
                && *cur >= apps.len()
            {
                return Err(format!("cursor {cur} out of bounds for key {key}"));
            }
        }
        if seen != self.by_bundle.len() {
            return Err(format!(
                "reverse index has {} entries, forward map has {seen}",
                self.by_bundle.len()
            ));
        }
        if let Some(k) = self.cursors.keys().find(|k| !self.assignments.contains_key(k)) {
            return Err(format!("stale cursor for key {k}"));
        }
        Ok(())
    }

    /// Remove `bundle_id` from `key`'s list, keeping the cursor on the same
    /// app where possible, and drop the key if the list empties.
    fn detach(&mut self, bundle_id: &str, key: char) {
        self.by_bundle.remove(bundle_id);
        let Some(apps) = self.assignments.get_mut(&key) else {
            return;
        };
        let Some(idx) = apps.iter().position(|a| a.bundle_id == bundle_id) else {
            return;
        };
        apps.remove(idx);
        let len = apps.len();
        if len == 0 {
            self.assignments.remove(&key);
            self.cursors.remove(&key);
            return;
        }
        if let Some(cur) = self.cursors.get_mut(&key)
            && idx < *cur
        {
            *cur -= 1;
        }
        self.clamp_cursor(key, len);
    }

    fn clamp_cursor(&mut self, key: char, len: usize) {
        if let Some(cur) = self.cursors.get_mut(&key)
            && *cur >= len
        {
            *cur = 0;
        }
    }
}
