use parking_lot::Mutex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::trace;

/// What part of the engine state changed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Change {
    /// Assignments were added, removed, or auto-assigned.
    Assignments,
    /// A setting changed (enabled, relaunch, modifiers, ignored apps, login).
    Settings,
}

/// Fans change notifications out to every live subscriber.
#[derive(Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<UnboundedSender<Change>>>,
}

impl ChangeNotifier {
    /// Register a new receiver.
    pub fn subscribe(&self) -> UnboundedReceiver<Change> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Send `change` to all receivers, dropping those that have gone away.
    pub fn notify(&self, change: Change) {
        let mut subs = self.subscribers.lock();
        subs.retain(|tx| tx.send(change).is_ok());
        trace!(?change, receivers = subs.len(), "change_notified");
    }
}
