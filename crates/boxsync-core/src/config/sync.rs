//! Synchronization timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing for the reload loop, push debounce, and idle auto-lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Delay between the end of one full reload and the next scheduled one.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Idle time after which an unlocked container is locked automatically.
    #[serde(default = "default_auto_lock_idle")]
    pub auto_lock_idle_ms: u64,
    /// A non-push job-list change only triggers a reload when the last pushed
    /// container change is older than this.
    #[serde(default = "default_push_reload_threshold")]
    pub push_reload_threshold_ms: u64,
    /// Capacity of the container event broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
}

impl SyncConfig {
    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Auto-lock idle threshold as a [`Duration`].
    pub fn auto_lock_idle(&self) -> Duration {
        Duration::from_millis(self.auto_lock_idle_ms)
    }

    /// Push debounce threshold as a [`Duration`].
    pub fn push_reload_threshold(&self) -> Duration {
        Duration::from_millis(self.push_reload_threshold_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            auto_lock_idle_ms: default_auto_lock_idle(),
            push_reload_threshold_ms: default_push_reload_threshold(),
            event_buffer_size: default_event_buffer(),
        }
    }
}

fn default_poll_interval() -> u64 {
    10_000
}

fn default_auto_lock_idle() -> u64 {
    300_000
}

fn default_push_reload_threshold() -> u64 {
    5_000
}

fn default_event_buffer() -> usize {
    256
}
