//! Launch-at-login toggle with rollback.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{info, warn};

use crate::{Error, Result, deps::LoginService};

/// Mirrors the login-item registration state.
///
/// The flag flips before the service is called so observers see the new value
/// at once. If the service refuses, the flag reverts and the error is
/// returned.
pub struct LoginItem {
    enabled: AtomicBool,
    service: Arc<dyn LoginService>,
}

impl LoginItem {
    /// Create with an initial mirrored state. The service is not called.
    pub fn new(service: Arc<dyn LoginService>, enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            service,
        }
    }

    /// Current state.
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Overwrite the mirrored state without calling the service.
    pub(crate) fn restore(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Register or unregister. Returns `Ok(true)` when the state changed.
    pub fn set(&self, enabled: bool) -> Result<bool> {
        let previous = self.enabled.swap(enabled, Ordering::SeqCst);
        if previous == enabled {
            return Ok(false);
        }
        let outcome = if enabled {
            self.service.register()
        } else {
            self.service.unregister()
        };
        match outcome {
            Ok(()) => {
                info!(enabled, "login_item_updated");
                Ok(true)
            }
            Err(message) => {
                self.enabled.store(previous, Ordering::SeqCst);
                warn!(enabled, %message, "login_item_update_failed");
                Err(Error::Login(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeLogin;

    #[test]
    fn success_sticks() {
        let svc = Arc::new(FakeLogin::default());
        let item = LoginItem::new(svc.clone(), false);
        assert!(item.set(true).unwrap());
        assert!(item.enabled());
        assert!(svc.registered());
        assert!(!item.set(true).unwrap());
        assert_eq!(svc.calls(), 1);
    }

    #[test]
    fn failure_rolls_back() {
        let svc = Arc::new(FakeLogin::default());
        svc.set_fail(true);
        let item = LoginItem::new(svc.clone(), false);
        let err = item.set(true).unwrap_err();
        assert!(matches!(err, Error::Login(_)));
        assert!(!item.enabled());
        assert!(!svc.registered());
    }

    #[test]
    fn unregister_failure_keeps_enabled() {
        let svc = Arc::new(FakeLogin::default());
        let item = LoginItem::new(svc.clone(), true);
        svc.set_fail(true);
        assert!(item.set(false).is_err());
        assert!(item.enabled());
    }
}
