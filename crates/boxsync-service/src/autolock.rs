//! Locks containers nobody has visited for a while.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use boxsync_core::result::AppResult;
use boxsync_core::types::ContainerId;
use boxsync_entity::container::{Container, LockState};
use boxsync_entity::remote::ContainerRemote;

use crate::access::AccessTracker;
use crate::events::{ContainerEvent, EventBus};
use crate::registry::SharedRegistry;

/// Idle-based auto-lock sweep.
#[derive(Debug, Clone)]
pub struct AutoLockSweeper {
    remote: Arc<dyn ContainerRemote>,
    access: Arc<AccessTracker>,
    idle: Duration,
}

impl AutoLockSweeper {
    /// Create a sweeper locking containers idle for longer than `idle`.
    pub fn new(remote: Arc<dyn ContainerRemote>, access: Arc<AccessTracker>, idle: Duration) -> Self {
        Self {
            remote,
            access,
            idle,
        }
    }

    /// The idle threshold.
    pub fn idle(&self) -> Duration {
        self.idle
    }

    /// Unlocked containers whose last access is older than the threshold at
    /// `now_ms`, in canonical order.
    pub async fn candidates(&self, registry: &SharedRegistry, now_ms: i64) -> Vec<ContainerId> {
        let access = self.access.snapshot().await;
        let idle_ms = i64::try_from(self.idle.as_millis()).unwrap_or(i64::MAX);

        registry.read(|reg| {
            reg.iter()
                .filter(|c| !c.is_locked())
                .filter(|c| {
                    let last = access.get(&c.id()).copied().unwrap_or(0);
                    now_ms.saturating_sub(last) > idle_ms
                })
                .map(Container::id)
                .collect()
        })
    }

    /// Lock idle containers one at a time.
    ///
    /// Locking a container drops its descendants from the sweep, since they
    /// are no longer reachable. The first failed lock ends the sweep with
    /// that error; the remaining containers are retried next time.
    pub async fn sweep(
        &self,
        registry: &SharedRegistry,
        events: &EventBus,
        now_ms: i64,
    ) -> AppResult<Vec<ContainerId>> {
        let mut candidates = self.candidates(registry, now_ms).await;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        debug!(candidates = candidates.len(), "Auto-lock sweep started");

        let mut locked = Vec::new();
        while let Some(&id) = candidates.first() {
            // the tree may have changed while the previous lock was in flight
            let still_unlocked = registry.read(|reg| reg.get(id).is_some_and(|c| !c.is_locked()));
            if !still_unlocked {
                candidates.remove(0);
                continue;
            }

            if let Err(e) = lock_container(self.remote.as_ref(), registry, events, id).await {
                warn!(container_id = %id, error = %e, "Auto-lock failed, stopping sweep");
                return Err(e);
            }
            locked.push(id);
            registry.read(|reg| candidates.retain(|c| *c != id && !reg.is_descendant(*c, id)));
        }

        info!(locked = locked.len(), "Auto-locked idle containers");
        Ok(locked)
    }
}

/// Lock `id` remotely, then mirror the new state locally and notify.
pub(crate) async fn lock_container(
    remote: &dyn ContainerRemote,
    registry: &SharedRegistry,
    events: &EventBus,
    id: ContainerId,
) -> AppResult<()> {
    remote.lock(id).await?;

    let updated = registry.write(|reg| {
        reg.get_mut(id).map(|c| {
            c.set_locked(LockState::On);
            c.clone()
        })
    });
    if let Some(container) = updated {
        events.emit(ContainerEvent::ContainerChanged(container));
    }
    Ok(())
}
