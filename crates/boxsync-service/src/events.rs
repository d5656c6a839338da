//! Events broadcast to observers of the container tree.

use tokio::sync::broadcast;
use tracing::trace;

use boxsync_core::types::ContainerId;
use boxsync_entity::container::Container;

/// Something observers of the tree may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerEvent {
    /// Fields of a container changed in place.
    ContainerChanged(Container),
    /// The flat container list was rebuilt.
    ContainerListChanged {
        /// `true` for pushed changes, which always count as a change;
        /// `false` for a full reload that detected differences.
        unconditional: bool,
    },
    /// A container created through this client appeared after reload.
    ContainerCreated(Container),
    /// A container renamed through this client was reloaded.
    ContainerRenamed(Container),
    /// An explicit lock failed; `message` is ready to show to the user.
    LockFailed {
        /// The container that could not be locked.
        id: ContainerId,
        /// Composed user-facing message.
        message: String,
    },
}

impl ContainerEvent {
    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContainerChanged(_) => "container_changed",
            Self::ContainerListChanged { .. } => "container_list_changed",
            Self::ContainerCreated(_) => "container_created",
            Self::ContainerRenamed(_) => "container_renamed",
            Self::LockFailed { .. } => "lock_failed",
        }
    }
}

/// Broadcast channel for [`ContainerEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ContainerEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per slow receiver.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ContainerEvent> {
        self.sender.subscribe()
    }

    /// Emit an event. Having no subscribers is fine.
    pub fn emit(&self, event: ContainerEvent) {
        trace!(event = event.name(), "Emitting container event");
        let _ = self.sender.send(event);
    }
}
