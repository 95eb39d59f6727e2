use std::sync::Arc;

use config::SettingsStore;

use crate::apps::RunningApp;

// ---- Application directory capabilities ----

/// Bring a running application to the front.
pub trait Activator: Send + Sync {
    /// Returns false when the app is not running or refused activation.
    fn activate(&self, bundle_id: &str) -> bool;
}

/// Start an application that is not running.
pub trait Launcher: Send + Sync {
    /// Returns true when the launch request was accepted.
    fn launch(&self, bundle_id: &str) -> bool;
}

/// Enumerate running applications.
pub trait AppDirectory: Send + Sync {
    /// Regular (user-facing) running applications.
    fn running_apps(&self) -> Vec<RunningApp>;
    /// The pid of the frontmost application, if known.
    fn frontmost_pid(&self) -> Option<i32> {
        None
    }
}

/// Register or unregister the process as a login item.
pub trait LoginService: Send + Sync {
    /// Add the login item.
    fn register(&self) -> Result<(), String>;
    /// Remove the login item.
    fn unregister(&self) -> Result<(), String>;
}

/// Groups the engine's external collaborators so construction sites name
/// every dependency explicitly.
#[derive(Clone)]
pub struct Services {
    /// Brings running apps forward.
    pub activator: Arc<dyn Activator>,
    /// Starts apps that are not running.
    pub launcher: Arc<dyn Launcher>,
    /// Lists running apps.
    pub directory: Arc<dyn AppDirectory>,
    /// Login item registration.
    pub login: Arc<dyn LoginService>,
    /// Settings persistence.
    pub store: Arc<dyn SettingsStore>,
}

/// A directory and login service that do nothing. Activation always fails,
/// launches are refused, and no apps are running.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullApps;

impl Activator for NullApps {
    fn activate(&self, _bundle_id: &str) -> bool {
        false
    }
}

impl Launcher for NullApps {
    fn launch(&self, _bundle_id: &str) -> bool {
        false
    }
}

impl AppDirectory for NullApps {
    fn running_apps(&self) -> Vec<RunningApp> {
        Vec::new()
    }
}

impl LoginService for NullApps {
    fn register(&self) -> Result<(), String> {
        Err("login items are not supported here".into())
    }
    fn unregister(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Services {
    /// Services backed by `store` with inert app and login collaborators.
    pub fn offline(store: Arc<dyn SettingsStore>) -> Self {
        let null = Arc::new(NullApps);
        Self {
            activator: null.clone(),
            launcher: null.clone(),
            directory: null.clone(),
            login: null,
            store,
        }
    }
}
