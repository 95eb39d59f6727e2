//! Test doubles for the engine's collaborators.
//! These are public so integration tests can use them; they do no I/O.

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use config::{MemoryStore, SettingsStore};
use parking_lot::Mutex;

use crate::{
    apps::RunningApp,
    deps::{Activator, AppDirectory, Launcher, LoginService, Services},
};

/// A call recorded by [`FakeApps`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppCall {
    /// `activate(bundle_id)`
    Activate(String),
    /// `launch(bundle_id)`
    Launch(String),
}

/// In-memory app directory. Activation succeeds for running bundle ids;
/// launching marks the bundle as running unless launches are refused.
#[derive(Default)]
pub struct FakeApps {
    apps: Mutex<Vec<RunningApp>>,
    running: Mutex<HashSet<String>>,
    calls: Mutex<Vec<AppCall>>,
    refuse_launch: AtomicBool,
}

impl FakeApps {
    /// A directory whose running set is `apps`.
    pub fn with_running(apps: Vec<RunningApp>) -> Self {
        let fake = Self::default();
        for app in &apps {
            if let Some(b) = &app.bundle_id {
                fake.running.lock().insert(b.clone());
            }
        }
        *fake.apps.lock() = apps;
        fake
    }

    /// Mark a bundle id as running (activation will succeed).
    pub fn set_running(&self, bundle_id: &str, running: bool) {
        let mut set = self.running.lock();
        if running {
            set.insert(bundle_id.to_string());
        } else {
            set.remove(bundle_id);
        }
    }

    /// Make `launch` fail.
    pub fn refuse_launches(&self, refuse: bool) {
        self.refuse_launch.store(refuse, Ordering::SeqCst);
    }

    /// Calls in the order they were made.
    pub fn calls(&self) -> Vec<AppCall> {
        self.calls.lock().clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

impl Activator for FakeApps {
    fn activate(&self, bundle_id: &str) -> bool {
        self.calls
            .lock()
            .push(AppCall::Activate(bundle_id.to_string()));
        self.running.lock().contains(bundle_id)
    }
}

impl Launcher for FakeApps {
    fn launch(&self, bundle_id: &str) -> bool {
        self.calls.lock().push(AppCall::Launch(bundle_id.to_string()));
        if self.refuse_launch.load(Ordering::SeqCst) {
            return false;
        }
        self.running.lock().insert(bundle_id.to_string());
        true
    }
}

impl AppDirectory for FakeApps {
    fn running_apps(&self) -> Vec<RunningApp> {
        self.apps.lock().clone()
    }
}

/// Login service that records calls and can be told to fail.
#[derive(Default)]
pub struct FakeLogin {
    registered: AtomicBool,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl FakeLogin {
    /// Make every call fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Whether the last successful call registered.
    pub fn registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// Total calls, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn update(&self, registered: bool) -> Result<(), String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err("operation not permitted".into());
        }
        self.registered.store(registered, Ordering::SeqCst);
        Ok(())
    }
}

impl LoginService for FakeLogin {
    fn register(&self) -> Result<(), String> {
        self.update(true)
    }
    fn unregister(&self) -> Result<(), String> {
        self.update(false)
    }
}

/// Handles to the fakes behind a [`Services`] bundle.
pub struct Fakes {
    /// App directory, activator, and launcher.
    pub apps: Arc<FakeApps>,
    /// Login service.
    pub login: Arc<FakeLogin>,
    /// Settings store.
    pub store: Arc<MemoryStore>,
}

impl Fakes {
    /// Fresh fakes with an empty store and no running apps.
    pub fn new() -> Self {
        Self::with(FakeApps::default(), MemoryStore::new())
    }

    /// Fakes around the given app directory and store.
    pub fn with(apps: FakeApps, store: MemoryStore) -> Self {
        Self {
            apps: Arc::new(apps),
            login: Arc::new(FakeLogin::default()),
            store: Arc::new(store),
        }
    }

    /// A services bundle that routes every capability to these fakes.
    pub fn services(&self) -> Services {
        let store: Arc<dyn SettingsStore> = self.store.clone();
        Services {
            activator: self.apps.clone(),
            launcher: self.apps.clone(),
            directory: self.apps.clone(),
            login: self.login.clone(),
            store,
        }
    }
}

impl Default for Fakes {
    fn default() -> Self {
        Self::new()
    }
}
