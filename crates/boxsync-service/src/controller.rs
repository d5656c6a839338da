//! The sync controller: owns the container tree and keeps it current.
//!
//! Three channels update the tree: full reloads (polling, session events,
//! after mutations), pushed incremental changes, and the auto-lock sweep that
//! runs at the start of every reload. Containers whose fields change are
//! announced one by one before the list change. At most one reload is in
//! flight; callers asking for another while one runs join the running one.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, info, trace};

use boxsync_core::config::{SyncConfig, WellKnownConfig};
use boxsync_core::events::SessionEvent;
use boxsync_core::traits::reporter::{ErrorReporter, LogReporter};
use boxsync_core::types::ContainerId;
use boxsync_entity::container::{Container, ContainerChangePush, ContainerRecord};
use boxsync_entity::remote::ContainerRemote;

use crate::access::AccessTracker;
use crate::autolock::AutoLockSweeper;
use crate::events::{ContainerEvent, EventBus};
use crate::push::{PushOutcome, apply_push};
use crate::reconcile::reconcile;
use crate::registry::{ContainerRegistry, SharedRegistry};
use crate::timer::ReloadTimer;

/// Completion handle of a reload. Cloneable; every clone resolves when the
/// reload finishes, successfully or not.
pub type LoadHandle = Shared<BoxFuture<'static, ()>>;

/// Keeps the local container tree in sync with the device.
#[derive(Clone)]
pub struct SyncController {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) remote: Arc<dyn ContainerRemote>,
    pub(crate) access: Arc<AccessTracker>,
    pub(crate) sweeper: AutoLockSweeper,
    pub(crate) registry: SharedRegistry,
    pub(crate) events: EventBus,
    pub(crate) reporter: Arc<dyn ErrorReporter>,
    pub(crate) sync: SyncConfig,
    pub(crate) well_known: WellKnownConfig,
    timer: ReloadTimer,
    in_flight: Mutex<Option<LoadHandle>>,
    last_push: Mutex<Option<Instant>>,
    stopped: AtomicBool,
}

impl fmt::Debug for SyncController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncController")
            .field("containers", &self.inner.registry.read(ContainerRegistry::len))
            .field("loading", &self.is_loading())
            .field("poll_scheduled", &self.inner.timer.is_scheduled())
            .field("sync", &self.inner.sync)
            .finish()
    }
}

/// Builder for [`SyncController`].
pub struct SyncControllerBuilder {
    remote: Arc<dyn ContainerRemote>,
    access: Arc<AccessTracker>,
    sync: SyncConfig,
    well_known: WellKnownConfig,
    reporter: Arc<dyn ErrorReporter>,
}

impl SyncControllerBuilder {
    /// Timing configuration.
    pub fn sync_config(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Ids of the built-in containers.
    pub fn well_known(mut self, well_known: WellKnownConfig) -> Self {
        self.well_known = well_known;
        self
    }

    /// Where background errors go. Defaults to [`LogReporter`].
    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Build the controller. Nothing is loaded until [`SyncController::start`]
    /// or [`SyncController::load`].
    pub fn build(self) -> SyncController {
        let sweeper = AutoLockSweeper::new(
            self.remote.clone(),
            self.access.clone(),
            self.sync.auto_lock_idle(),
        );
        let events = EventBus::new(self.sync.event_buffer_size);

        SyncController {
            inner: Arc::new(Inner {
                remote: self.remote,
                access: self.access,
                sweeper,
                registry: SharedRegistry::new(),
                events,
                reporter: self.reporter,
                sync: self.sync,
                well_known: self.well_known,
                timer: ReloadTimer::new(),
                in_flight: Mutex::new(None),
                last_push: Mutex::new(None),
                stopped: AtomicBool::new(false),
            }),
        }
    }
}

impl SyncController {
    /// Start building a controller around a remote and an access tracker.
    pub fn builder(remote: Arc<dyn ContainerRemote>, access: Arc<AccessTracker>) -> SyncControllerBuilder {
        SyncControllerBuilder {
            remote,
            access,
            sync: SyncConfig::default(),
            well_known: WellKnownConfig::default(),
            reporter: Arc::new(LogReporter),
        }
    }

    /// Forget previous access times and perform the first reload.
    pub async fn start(&self) {
        self.inner.stopped.store(false, Ordering::SeqCst);
        if let Err(e) = self.inner.access.reset().await {
            self.inner.reporter.report("reset access map", &e);
        }
        self.load().await;
        info!(
            containers = self.inner.registry.read(ContainerRegistry::len),
            poll_interval_ms = self.inner.sync.poll_interval_ms,
            "Container sync started"
        );
    }

    /// Stop polling. A reload already in flight still completes but does
    /// not schedule another.
    pub fn shutdown(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        self.inner.timer.cancel();
        info!("Container sync stopped");
    }

    /// Reload the full tree, or join the reload already in flight.
    pub fn load(&self) -> LoadHandle {
        let mut in_flight = self.inner.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = in_flight.as_ref() {
            trace!("Reload already in flight, joining it");
            return handle.clone();
        }

        self.inner.timer.cancel();

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move { inner.run_load().await });
        let handle = async move {
            if let Err(e) = task.await {
                error!(error = %e, "Container reload task failed");
            }
        }
        .boxed()
        .shared();

        *in_flight = Some(handle.clone());
        handle
    }

    /// Whether a reload is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Whether the next polling reload is scheduled.
    pub fn is_poll_scheduled(&self) -> bool {
        self.inner.timer.is_scheduled()
    }

    /// Apply a pushed incremental change.
    pub fn apply_push(&self, push: &ContainerChangePush) -> PushOutcome {
        *self.inner.last_push.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());

        let (outcome, changed) = self.inner.registry.write(|reg| {
            let outcome = apply_push(reg, push);
            reg.sort_by_name();
            let changed = cloned(reg, &outcome.changed_ids);
            (outcome, changed)
        });
        debug!(
            added = outcome.added_ids.len(),
            changed = outcome.changed_ids.len(),
            removed = outcome.removed_ids.len(),
            "Applied pushed container change"
        );

        for container in changed {
            self.inner.events.emit(ContainerEvent::ContainerChanged(container));
        }
        self.inner
            .events
            .emit(ContainerEvent::ContainerListChanged { unconditional: true });
        outcome
    }

    /// The device finished initializing its database; everything may differ.
    pub fn on_db_initialization_ready(&self) -> LoadHandle {
        info!("Device database ready, reloading containers");
        self.load()
    }

    /// React to a session event. Returns the reload it triggered, if any.
    pub fn on_session_event(&self, event: &SessionEvent) -> Option<LoadHandle> {
        debug!(event = event.name(), "Session event");
        match event {
            SessionEvent::Login | SessionEvent::Logout | SessionEvent::SocketClosed => Some(self.load()),
            // pushed job changes arrive with their own container change
            SessionEvent::JobListChanged { from_push: true, .. } => None,
            SessionEvent::JobListChanged { from_push: false, .. } => {
                if self.push_is_stale() {
                    Some(self.load())
                } else {
                    trace!("Recent pushed container change, skipping reload");
                    None
                }
            }
        }
    }

    fn push_is_stale(&self) -> bool {
        let last_push = *self.inner.last_push.lock().unwrap_or_else(|e| e.into_inner());
        last_push.is_none_or(|at| at.elapsed() > self.inner.sync.push_reload_threshold())
    }

    /// Subscribe to container events.
    pub fn subscribe(&self) -> broadcast::Receiver<ContainerEvent> {
        self.inner.events.subscribe()
    }

    /// All containers in canonical order.
    pub fn containers(&self) -> Vec<Container> {
        self.inner.registry.read(ContainerRegistry::snapshot)
    }

    /// One container by id.
    pub fn container(&self, id: ContainerId) -> Option<Container> {
        self.inner.registry.read(|reg| reg.get(id).cloned())
    }

    /// Children of `id` in display order.
    pub fn children(&self, id: ContainerId) -> Vec<Container> {
        self.inner.registry.read(|reg| reg.children_of(id))
    }

    /// Run `f` against the current tree.
    pub fn with_registry<R>(&self, f: impl FnOnce(&ContainerRegistry) -> R) -> R {
        self.inner.registry.read(f)
    }

    /// The shared tree, for collaborators such as [`ContainerPolicy`](crate::policy::ContainerPolicy).
    pub fn registry(&self) -> SharedRegistry {
        self.inner.registry.clone()
    }

    /// Ids of the built-in containers.
    pub fn well_known(&self) -> &WellKnownConfig {
        &self.inner.well_known
    }

    /// The active job list container.
    pub fn active_container(&self) -> Option<Container> {
        self.container(self.inner.well_known.active)
    }

    /// The editable active job list container.
    pub fn editable_active_container(&self) -> Option<Container> {
        self.container(self.inner.well_known.editable_active)
    }

    /// The finished jobs container.
    pub fn finished_container(&self) -> Option<Container> {
        self.container(self.inner.well_known.finished)
    }

    /// The held jobs container.
    pub fn hold_container(&self) -> Option<Container> {
        self.container(self.inner.well_known.hold)
    }
}

/// Current state of `ids`, skipping any no longer registered.
fn cloned(reg: &ContainerRegistry, ids: &[ContainerId]) -> Vec<Container> {
    ids.iter().filter_map(|id| reg.get(*id).cloned()).collect()
}

/// Clears the in-flight slot and reschedules polling when a reload ends,
/// however it ends.
struct LoadGuard(Arc<Inner>);

impl Drop for LoadGuard {
    fn drop(&mut self) {
        self.0.finish_load();
    }
}

impl Inner {
    async fn run_load(self: Arc<Self>) {
        let _guard = LoadGuard(Arc::clone(&self));
        let started = Instant::now();

        // a failed lock ends this cycle; the guard still reschedules polling
        let now_ms = Utc::now().timestamp_millis();
        if let Err(e) = self.sweeper.sweep(&self.registry, &self.events, now_ms).await {
            self.reporter.report("auto-lock sweep", &e);
            return;
        }

        match self.remote.fetch_containers().await {
            Ok(records) => self.commit_snapshot(&records),
            Err(e) => self.reporter.report("reload containers", &e),
        }

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Container reload finished"
        );
    }

    fn commit_snapshot(&self, records: &[ContainerRecord]) {
        let (outcome, changed) = self.registry.write(|reg| {
            let outcome = reconcile(reg, records);
            reg.sort_by_name();
            let changed = cloned(reg, &outcome.changed_ids);
            (outcome, changed)
        });

        for container in changed {
            self.events.emit(ContainerEvent::ContainerChanged(container));
        }
        if outcome.changed {
            self.events
                .emit(ContainerEvent::ContainerListChanged { unconditional: false });
        }
    }

    fn finish_load(self: &Arc<Self>) {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if self.stopped.load(Ordering::SeqCst) {
            return;
        }

        let weak = Arc::downgrade(self);
        self.timer.schedule(self.sync.poll_interval(), move || {
            if let Some(inner) = weak.upgrade() {
                trace!("Poll timer fired");
                let _ = SyncController { inner }.load();
            }
        });
    }
}
