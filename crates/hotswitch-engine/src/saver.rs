//! Debounced persistence.
//!
//! Every mutation calls [`SaveScheduler::schedule`]; only the last call in a
//! burst writes, one debounce interval after it. [`SaveScheduler::flush`]
//! writes immediately and cancels anything pending. Callers outside a tokio
//! runtime are timed on a shared background runtime, so bursts coalesce the
//! same way.

use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::{
    runtime::{Builder, Handle, Runtime},
    time,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, trace, warn};

/// Default quiet period before a scheduled save is written.
pub const SAVE_DEBOUNCE_MS: u64 = 1000;

type SaveFn = dyn Fn() -> config::Result<()> + Send + Sync;

static SAVE_RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();

/// Timer runtime for schedulers driven from plain threads. `None` if it could
/// not be started.
fn save_runtime() -> Option<&'static Runtime> {
    SAVE_RUNTIME
        .get_or_init(|| {
            match Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("hotswitch-save")
                .enable_time()
                .build()
            {
                Ok(rt) => Some(rt),
                Err(e) => {
                    warn!(error = %e, "save_runtime_unavailable");
                    None
                }
            }
        })
        .as_ref()
}

struct Pending {
    generation: u64,
    token: CancellationToken,
}

/// Coalesces save requests into a single write per quiet period.
#[derive(Clone)]
pub struct SaveScheduler {
    delay: Duration,
    save: Arc<SaveFn>,
    pending: Arc<Mutex<Option<Pending>>>,
    generation: Arc<AtomicU64>,
}

impl SaveScheduler {
    /// Create a scheduler that calls `save` to write.
    pub fn new<F>(delay: Duration, save: F) -> Self
    where
        F: Fn() -> config::Result<()> + Send + Sync + 'static,
    {
        Self {
            delay,
            save: Arc::new(save),
            pending: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The debounce interval.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// True while a debounced write is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Request a save. Restarts the quiet period if one is already running.
    pub fn schedule(&self) {
        let handle = match Handle::try_current() {
            Ok(h) => h,
            Err(_) => match save_runtime() {
                Some(rt) => rt.handle().clone(),
                None => {
                    self.cancel_pending();
                    trace!("save_immediate_no_runtime");
                    self.write();
                    return;
                }
            },
        };

        let token = CancellationToken::new();
        let cancel = token.clone();
        let generation = {
            let mut slot = self.pending.lock();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(prev) = slot.replace(Pending { generation, token }) {
                prev.token.cancel();
            }
            generation
        };

        let this = self.clone();
        let delay = self.delay;
        handle.spawn(async move {
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = cancel.cancelled() => {
                    trace!(generation, "save_debounce_cancelled");
                    return;
                }
            }
            {
                let mut slot = this.pending.lock();
                match slot.as_ref() {
                    Some(p) if p.generation == generation => {
                        *slot = None;
                    }
                    // Superseded or flushed while waking up.
                    _ => return,
                }
            }
            trace!(generation, "save_debounce_fired");
            this.write();
        });
    }

    /// Write now, cancelling any pending debounced write.
    pub fn flush(&self) -> config::Result<()> {
        self.cancel_pending();
        (self.save)()
    }

    fn cancel_pending(&self) {
        if let Some(prev) = self.pending.lock().take() {
            prev.token.cancel();
        }
    }

    fn write(&self) {
        if let Err(e) = (self.save)() {
            error!(error = %e, "settings_save_failed");
        }
    }
}
