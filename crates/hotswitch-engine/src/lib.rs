//! Hotswitch Engine
//!
//! The engine owns the key registry and settings, and coordinates the side
//! effects around them:
//! - routes keyboard events and activates (or launches) the selected app
//! - persists every change through a debounced [`SaveScheduler`]
//! - keeps a cache of running apps for auto-assignment
//! - mirrors the login-item state, rolling back when registration fails
//! - tells subscribers when assignments or settings change
//!
//! OS integration lives behind the traits in [`deps`], so the engine runs
//! unchanged against real services or the fakes in [`test_support`].
use std::{
    mem,
    sync::Arc,
    time::{Duration, Instant},
};

mod apps;
pub mod deps;
mod dispatch;
mod error;
mod login;
mod matcher;
mod notification;
mod saver;
pub mod test_support;

use assignments::{AppRef, IgnoredApps, Registry};
use config::{ModifierConfig, Snapshot};
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, trace, warn};

pub use apps::{AppEvent, RunningApp, RunningApps, Subscription};
pub use deps::Services;
pub use dispatch::{EventKind, KeyEvent, Pass, Route, is_open_settings};
pub use error::{Error, Result};
pub use login::LoginItem;
pub use matcher::matches;
pub use notification::Change;
pub use saver::{SAVE_DEBOUNCE_MS, SaveScheduler};

use notification::ChangeNotifier;

// Routing happens on the event-tap thread and must stay well under this.
const DISPATCH_WARN_MS: u64 = 1;

/// In-memory state guarded by the engine's single lock.
struct State {
    registry: Registry,
    enabled: bool,
    relaunch_inactive_apps: bool,
    modifiers: ModifierConfig,
    ignored: IgnoredApps,
}

impl State {
    fn from_snapshot(s: &Snapshot) -> Self {
        Self {
            registry: Registry::from_records(&s.assignments),
            enabled: s.enabled,
            relaunch_inactive_apps: s.relaunch_inactive_apps,
            modifiers: s.modifier_config,
            ignored: IgnoredApps::from_records(&s.ignored_apps),
        }
    }

    fn to_snapshot(&self, launch_at_login: bool) -> Snapshot {
        Snapshot {
            assignments: self.registry.to_records(),
            enabled: self.enabled,
            relaunch_inactive_apps: self.relaunch_inactive_apps,
            modifier_config: self.modifiers,
            ignored_apps: self.ignored.to_records(),
            launch_at_login,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::from_snapshot(&Snapshot::default())
    }
}

/// Engine coordinates assignments, settings, persistence, and app switching.
///
/// Construct via [`Engine::new`], call [`Engine::load`] once, then feed
/// keyboard events to [`Engine::handle_key_event`]. All methods take `&self`
/// and may be called from any thread.
#[derive(Clone)]
pub struct Engine {
    state: Arc<Mutex<State>>,
    services: Services,
    login: Arc<LoginItem>,
    apps: RunningApps,
    saver: SaveScheduler,
    notifier: Arc<ChangeNotifier>,
}

impl Engine {
    /// Create an engine with default settings and the standard save debounce.
    pub fn new(services: Services) -> Self {
        Self::with_save_delay(services, Duration::from_millis(SAVE_DEBOUNCE_MS))
    }

    /// Create an engine with a custom save debounce interval.
    pub fn with_save_delay(services: Services, delay: Duration) -> Self {
        let state = Arc::new(Mutex::new(State::default()));
        let login = Arc::new(LoginItem::new(services.login.clone(), false));
        let saver = {
            let state = state.clone();
            let login = login.clone();
            let store = services.store.clone();
            SaveScheduler::new(delay, move || {
                let snapshot = state.lock().to_snapshot(login.enabled());
                store.save(&snapshot)
            })
        };
        Self {
            state,
            services,
            login,
            apps: RunningApps::new(),
            saver,
            notifier: Arc::new(ChangeNotifier::default()),
        }
    }

    // ---- Persistence ----

    /// Replace in-memory state with the stored snapshot.
    ///
    /// Returns `Ok(false)` when nothing is stored yet. On error the current
    /// state is left untouched.
    pub fn load(&self) -> Result<bool> {
        let loaded = match self.services.store.load() {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "settings_load_failed");
                return Err(e.into());
            }
        };
        let Some(snapshot) = loaded else {
            debug!("settings_missing_using_defaults");
            return Ok(false);
        };
        let keys = {
            let mut st = self.state.lock();
            *st = State::from_snapshot(&snapshot);
            st.registry.len()
        };
        self.login.restore(snapshot.launch_at_login);
        info!(keys, "settings_loaded");
        self.notifier.notify(Change::Assignments);
        self.notifier.notify(Change::Settings);
        Ok(true)
    }

    /// Write the current state now, cancelling any pending debounced save.
    pub fn flush(&self) -> Result<()> {
        self.saver.flush()?;
        Ok(())
    }

    /// True while a debounced save is waiting.
    pub fn save_pending(&self) -> bool {
        self.saver.is_pending()
    }

    /// The current state in persisted form.
    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().to_snapshot(self.login.enabled())
    }

    /// Receive a [`Change`] after every successful mutation.
    pub fn subscribe(&self) -> UnboundedReceiver<Change> {
        self.notifier.subscribe()
    }

    fn update(&self, change: Change, f: impl FnOnce(&mut State) -> bool) -> bool {
        let changed = f(&mut self.state.lock());
        if changed {
            self.changed(change);
        }
        changed
    }

    fn changed(&self, change: Change) {
        self.saver.schedule();
        self.notifier.notify(change);
    }

    // ---- Assignments ----

    /// Append an app to a key's cycle, moving it off any other key.
    pub fn assign(&self, key: char, bundle_id: &str, name: &str) -> bool {
        self.update(Change::Assignments, |st| {
            st.registry.assign(key, bundle_id, name)
        })
    }

    /// Drop every app assigned to `key`.
    pub fn remove_assignment(&self, key: char) -> bool {
        self.update(Change::Assignments, |st| st.registry.remove_assignment(key))
    }

    /// Remove one app from one key.
    pub fn remove_app(&self, bundle_id: &str, key: char) -> bool {
        self.update(Change::Assignments, |st| {
            st.registry.remove_app(bundle_id, key)
        })
    }

    /// Remove an app from whichever key holds it.
    pub fn remove_bundle(&self, bundle_id: &str) -> bool {
        self.update(Change::Assignments, |st| st.registry.remove_bundle(bundle_id))
    }

    /// Advance a key's cycle and return the app it now selects.
    pub fn next_bundle_id(&self, key: char) -> Option<String> {
        self.state.lock().registry.next_bundle_id(key)
    }

    /// Bundle ids assigned to `key`, in cycle order.
    pub fn bundle_ids(&self, key: char) -> Vec<String> {
        self.state.lock().registry.bundle_ids(key)
    }

    /// The key an app is assigned to.
    pub fn key_for(&self, bundle_id: &str) -> Option<char> {
        self.state.lock().registry.key_for(bundle_id)
    }

    /// Every assignment, ordered by key.
    pub fn assignments(&self) -> Vec<(char, Vec<AppRef>)> {
        self.state
            .lock()
            .registry
            .iter()
            .map(|(k, apps)| (k, apps.to_vec()))
            .collect()
    }

    /// Suggest a key for an app name.
    pub fn suggest_key(&self, name: &str) -> Option<char> {
        self.state.lock().registry.suggest_key(name)
    }

    /// Assign each candidate by initial, skipping assigned and ignored apps.
    pub fn auto_assign(&self, candidates: &[AppRef]) -> usize {
        let assigned = {
            let mut guard = self.state.lock();
            let st = &mut *guard;
            st.registry.auto_assign(candidates, &st.ignored)
        };
        if assigned > 0 {
            self.changed(Change::Assignments);
        }
        assigned
    }

    /// Auto-assign every cached running app that has a bundle id.
    pub fn auto_assign_running(&self) -> usize {
        let candidates: Vec<AppRef> = self
            .apps
            .list()
            .into_iter()
            .filter_map(|a| a.bundle_id.map(|b| AppRef::new(b, a.name)))
            .collect();
        self.auto_assign(&candidates)
    }

    // ---- Settings ----

    /// Whether hotkeys are handled at all.
    pub fn enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Turn hotkey handling on or off.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        self.update(Change::Settings, |st| {
            mem::replace(&mut st.enabled, enabled) != enabled
        })
    }

    /// Whether assigned apps that are not running get launched.
    pub fn relaunch_inactive_apps(&self) -> bool {
        self.state.lock().relaunch_inactive_apps
    }

    /// Set the relaunch behavior.
    pub fn set_relaunch_inactive_apps(&self, relaunch: bool) -> bool {
        self.update(Change::Settings, |st| {
            mem::replace(&mut st.relaunch_inactive_apps, relaunch) != relaunch
        })
    }

    /// The trigger modifiers.
    pub fn modifiers(&self) -> ModifierConfig {
        self.state.lock().modifiers
    }

    /// Replace the trigger modifiers.
    pub fn set_modifiers(&self, modifiers: ModifierConfig) -> bool {
        if modifiers.is_empty() {
            warn!("modifier_config_empty");
        }
        self.update(Change::Settings, |st| {
            mem::replace(&mut st.modifiers, modifiers) != modifiers
        })
    }

    /// Exclude an app from auto-assignment.
    pub fn ignore_app(&self, app: AppRef) -> bool {
        self.update(Change::Settings, |st| st.ignored.insert(app))
    }

    /// Allow an app to be auto-assigned again.
    pub fn unignore_app(&self, bundle_id: &str) -> bool {
        self.update(Change::Settings, |st| st.ignored.remove(bundle_id))
    }

    /// True when the app is excluded from auto-assignment.
    pub fn is_ignored(&self, bundle_id: &str) -> bool {
        self.state.lock().ignored.contains(bundle_id)
    }

    /// Ignored apps ordered by bundle id.
    pub fn ignored_apps(&self) -> Vec<AppRef> {
        self.state.lock().ignored.iter().cloned().collect()
    }

    /// Whether the login item is registered.
    pub fn launch_at_login(&self) -> bool {
        self.login.enabled()
    }

    /// Register or unregister the login item.
    ///
    /// On failure the previous value is restored, subscribers are told to
    /// re-read settings, and the error is returned.
    pub fn set_launch_at_login(&self, enabled: bool) -> Result<bool> {
        match self.login.set(enabled) {
            Ok(true) => {
                self.changed(Change::Settings);
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                self.notifier.notify(Change::Settings);
                Err(e)
            }
        }
    }

    // ---- Running apps ----

    /// The running-apps cache.
    pub fn running_apps(&self) -> &RunningApps {
        &self.apps
    }

    /// Rebuild the running-apps cache from the app directory.
    pub fn refresh_running_apps(&self) {
        self.apps.refresh(self.services.directory.as_ref());
    }

    // ---- Key events ----

    /// Route one keyboard event. Returns true when the event was consumed
    /// and must not reach the focused app.
    pub fn handle_key_event(&self, event: &KeyEvent) -> bool {
        let start = Instant::now();
        let (route, relaunch) = {
            let mut guard = self.state.lock();
            let st = &mut *guard;
            let route = dispatch::route(event, st.enabled, &st.modifiers, &mut st.registry);
            (route, st.relaunch_inactive_apps)
        };
        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(DISPATCH_WARN_MS) {
            warn!(elapsed_us = elapsed.as_micros() as u64, "key_routing_slow");
        }
        match route {
            Route::Pass(reason) => {
                trace!(?reason, scancode = event.scancode, "key_passed");
                false
            }
            Route::Switch { key, bundle_id } => self.switch_to(key, &bundle_id, relaunch),
        }
    }

    /// Activate, falling back to launch when allowed. Returns whether the
    /// event counts as consumed.
    fn switch_to(&self, key: char, bundle_id: &str, relaunch: bool) -> bool {
        if self.services.activator.activate(bundle_id) {
            debug!(%key, bundle_id, "app_activated");
            return true;
        }
        if !relaunch {
            debug!(%key, bundle_id, "app_not_running");
            return false;
        }
        let launched = self.services.launcher.launch(bundle_id);
        if launched {
            info!(%key, bundle_id, "app_launched");
        } else {
            warn!(%key, bundle_id, "app_launch_failed");
        }
        launched
    }
}
