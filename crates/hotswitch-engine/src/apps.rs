//! Cache of running applications with change subscriptions.
//!
//! The cache is rebuilt wholesale by [`RunningApps::refresh`] and patched
//! incrementally by [`RunningApps::apply`]. Subscribers receive every applied
//! event. Dropping (or cancelling) a [`Subscription`] stops delivery
//! immediately: once `cancel` returns, the callback will not run again, even
//! if another thread is mid-delivery.

use std::{
    collections::HashMap,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tracing::{debug, trace};

use crate::deps::AppDirectory;

/// A user-facing running application.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunningApp {
    /// Process id.
    pub pid: i32,
    /// Bundle identifier. Some processes have none and cannot be assigned.
    pub bundle_id: Option<String>,
    /// Localized display name.
    pub name: String,
}

impl RunningApp {
    /// Convenience constructor for apps with a bundle id.
    pub fn new(pid: i32, bundle_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pid,
            bundle_id: Some(bundle_id.into()),
            name: name.into(),
        }
    }
}

/// Workspace notifications the cache understands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppEvent {
    /// An app finished launching.
    Launched(RunningApp),
    /// An app exited.
    Terminated {
        /// Process id of the exited app.
        pid: i32,
    },
    /// An app became frontmost.
    Activated {
        /// Process id of the activated app.
        pid: i32,
    },
}

type Callback = Box<dyn Fn(&AppEvent) + Send + Sync>;

struct Subscriber {
    id: u64,
    active: AtomicBool,
    /// Held while delivering. Cancelling takes it too, so a cancel from
    /// another thread waits out an in-flight callback. Reentrant so a
    /// callback may cancel its own subscription.
    gate: ReentrantMutex<()>,
    callback: Callback,
}

#[derive(Default)]
struct Cache {
    apps: HashMap<i32, RunningApp>,
    frontmost: Option<i32>,
}

#[derive(Default)]
struct Inner {
    cache: RwLock<Cache>,
    subscribers: Mutex<Vec<Arc<Subscriber>>>,
    next_id: AtomicU64,
}

impl Inner {
    fn unsubscribe(&self, id: u64) {
        let sub = {
            let mut subs = self.subscribers.lock();
            let Some(pos) = subs.iter().position(|s| s.id == id) else {
                return;
            };
            subs.remove(pos)
        };
        let _gate = sub.gate.lock();
        sub.active.store(false, Ordering::SeqCst);
        trace!(id, "app_subscription_cancelled");
    }
}

/// Shared, cloneable cache of running applications.
#[derive(Clone, Default)]
pub struct RunningApps {
    inner: Arc<Inner>,
}

impl RunningApps {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache contents with what `directory` reports.
    pub fn refresh(&self, directory: &dyn AppDirectory) {
        let apps = directory.running_apps();
        let frontmost = directory.frontmost_pid();
        let mut cache = self.inner.cache.write();
        cache.apps = apps.into_iter().map(|a| (a.pid, a)).collect();
        let frontmost = frontmost.filter(|pid| cache.apps.contains_key(pid));
        cache.frontmost = frontmost;
        debug!(count = cache.apps.len(), "running_apps_refreshed");
    }

    /// Patch the cache with one event, then notify subscribers.
    pub fn apply(&self, event: AppEvent) {
        {
            let mut cache = self.inner.cache.write();
            match &event {
                AppEvent::Launched(app) => {
                    cache.apps.insert(app.pid, app.clone());
                }
                AppEvent::Terminated { pid } => {
                    cache.apps.remove(pid);
                    if cache.frontmost == Some(*pid) {
                        cache.frontmost = None;
                    }
                }
                AppEvent::Activated { pid } => {
                    cache.frontmost = Some(*pid);
                }
            }
        }
        trace!(?event, "app_event");
        let subs: Vec<Arc<Subscriber>> = self.inner.subscribers.lock().clone();
        for sub in subs {
            let _gate = sub.gate.lock();
            if sub.active.load(Ordering::SeqCst) {
                (sub.callback)(&event);
            }
        }
    }

    /// Look up an app by pid.
    pub fn get(&self, pid: i32) -> Option<RunningApp> {
        self.inner.cache.read().apps.get(&pid).cloned()
    }

    /// First running instance of `bundle_id`, lowest pid first.
    pub fn by_bundle_id(&self, bundle_id: &str) -> Option<RunningApp> {
        let cache = self.inner.cache.read();
        cache
            .apps
            .values()
            .filter(|a| a.bundle_id.as_deref() == Some(bundle_id))
            .min_by_key(|a| a.pid)
            .cloned()
    }

    /// True when any instance of `bundle_id` is running.
    pub fn is_running(&self, bundle_id: &str) -> bool {
        self.by_bundle_id(bundle_id).is_some()
    }

    /// All cached apps, ordered by name then pid.
    pub fn list(&self) -> Vec<RunningApp> {
        let mut apps: Vec<RunningApp> = self.inner.cache.read().apps.values().cloned().collect();
        apps.sort_by(|a, b| a.name.cmp(&b.name).then(a.pid.cmp(&b.pid)));
        apps
    }

    /// The frontmost app, when known and still cached.
    pub fn frontmost(&self) -> Option<RunningApp> {
        let cache = self.inner.cache.read();
        cache.frontmost.and_then(|pid| cache.apps.get(&pid).cloned())
    }

    /// Number of cached apps.
    pub fn len(&self) -> usize {
        self.inner.cache.read().apps.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receive every event passed to [`apply`](Self::apply) until the
    /// returned handle is dropped or cancelled.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let sub = Arc::new(Subscriber {
            id,
            active: AtomicBool::new(true),
            gate: ReentrantMutex::new(()),
            callback: Box::new(callback),
        });
        self.inner.subscribers.lock().push(sub);
        trace!(id, "app_subscription_added");
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

/// Handle for a running-apps subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    /// Stop delivery now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.unsubscribe(self.id);
        }
    }
}
