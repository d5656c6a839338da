//! One-shot, reschedulable delay used for polling reloads.

use std::sync::Mutex;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// At most one pending delayed callback.
///
/// Scheduling replaces (and aborts) the previous callback. Dropping the
/// timer cancels whatever is pending.
#[derive(Debug, Default)]
pub struct ReloadTimer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ReloadTimer {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` once after `delay`, replacing any pending callback.
    ///
    /// Outside a Tokio runtime nothing is scheduled.
    pub fn schedule<F>(&self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No Tokio runtime, reload timer not scheduled");
            return;
        };

        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
        trace!(delay_ms = delay.as_millis() as u64, "Reload timer scheduled");
    }

    /// Cancel the pending callback, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = pending.take() {
            task.abort();
            trace!("Reload timer cancelled");
        }
    }

    /// Whether a callback is waiting to run.
    pub fn is_scheduled(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for ReloadTimer {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}
