//! Applying pushed incremental changes to the container tree.
//!
//! Push records may arrive out of order and more than once. An "added"
//! record for a container that already exists is treated as a change, and a
//! parent the registry does not know yet makes the new container a root; the
//! next full reload puts it in place.

use tracing::{debug, warn};

use boxsync_core::types::ContainerId;
use boxsync_entity::container::{Container, ContainerChangePush, ContainerPatch};

use crate::registry::ContainerRegistry;

/// What a push application did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOutcome {
    /// Containers created by the push.
    pub added_ids: Vec<ContainerId>,
    /// Existing containers whose fields changed.
    pub changed_ids: Vec<ContainerId>,
    /// Containers removed, including descendants of deleted ones.
    pub removed_ids: Vec<ContainerId>,
}

/// Apply additions, then changes, then deletions.
///
/// The caller re-sorts the registry afterwards.
pub fn apply_push(registry: &mut ContainerRegistry, push: &ContainerChangePush) -> PushOutcome {
    let mut outcome = PushOutcome::default();
    let mut deferred: Vec<ContainerPatch> = Vec::new();

    for added in &push.new {
        let id = added.record.container_id;
        if registry.contains(id) {
            debug!(container_id = %id, "Pushed container already exists, applying as change");
            deferred.push(added.as_patch());
            continue;
        }

        registry.insert(Container::from_record(&added.record));
        match added.parent_container_id {
            Some(parent) if registry.contains(parent) => {
                if !registry.link(parent, id) {
                    warn!(container_id = %id, parent_id = %parent, "Cannot attach pushed container, keeping it as root");
                }
            }
            Some(parent) => {
                debug!(container_id = %id, parent_id = %parent, "Parent of pushed container unknown, adding as root");
            }
            None => {}
        }
        outcome.added_ids.push(id);
    }

    for patch in deferred.iter().chain(&push.changed) {
        let id = patch.container_id;
        match registry.get_mut(id) {
            Some(container) => {
                if container.apply_patch(patch) && !outcome.changed_ids.contains(&id) {
                    outcome.changed_ids.push(id);
                }
            }
            None => debug!(container_id = %id, "Change for unknown container ignored"),
        }
    }

    for deleted in &push.deleted {
        let removed = registry.remove_subtree(deleted.container_id);
        if removed.is_empty() {
            debug!(container_id = %deleted.container_id, "Delete for unknown container ignored");
        }
        outcome.removed_ids.extend(removed);
    }
    outcome
        .changed_ids
        .retain(|id| !outcome.removed_ids.contains(id));

    outcome
}
