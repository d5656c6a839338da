//! Merging a full snapshot into the container tree.
//!
//! The snapshot is authoritative and complete, so every visited container
//! has its children cleared and relinked from the snapshot instead of
//! diffing child lists. Containers are updated in place, never replaced.

use std::collections::hash_map::Entry;
use std::collections::HashSet;

use tracing::{debug, warn};

use boxsync_core::types::ContainerId;
use boxsync_entity::container::{Container, ContainerRecord};

use crate::registry::ContainerRegistry;

/// What a reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Whether anything observable changed, including pure removals.
    pub changed: bool,
    /// Existing containers whose fields changed, in visit order.
    pub changed_ids: Vec<ContainerId>,
    /// Containers seen for the first time.
    pub created_ids: Vec<ContainerId>,
    /// Containers absent from the snapshot and dropped.
    pub removed_ids: Vec<ContainerId>,
}

struct Pass<'a> {
    registry: &'a mut ContainerRegistry,
    order: Vec<ContainerId>,
    seen: HashSet<ContainerId>,
    outcome: ReconcileOutcome,
}

impl Pass<'_> {
    /// Merge one nesting level; returns whether anything in it changed.
    fn merge_level(&mut self, records: &[ContainerRecord], parent: Option<ContainerId>) -> bool {
        let mut changed = false;

        for record in records {
            let id = record.container_id;
            if !self.seen.insert(id) {
                warn!(container_id = %id, "Container listed twice in snapshot, keeping first");
                continue;
            }

            let nodes = self.registry.nodes_mut();
            let container = match nodes.entry(id) {
                Entry::Occupied(entry) => {
                    let container = entry.into_mut();
                    if container.update(record) {
                        changed = true;
                        self.outcome.changed_ids.push(id);
                    }
                    if container.parent() != parent {
                        changed = true;
                    }
                    container
                }
                Entry::Vacant(entry) => {
                    changed = true;
                    self.outcome.created_ids.push(id);
                    entry.insert(Container::from_record(record))
                }
            };

            container.clear_children();
            container.set_parent(parent);
            if let Some(parent) = parent {
                if let Some(parent_node) = nodes.get_mut(&parent) {
                    parent_node.add_child(id);
                }
            }
            self.order.push(id);

            if !record.container_list.is_empty() && self.merge_level(&record.container_list, Some(id)) {
                changed = true;
            }
        }

        changed
    }
}

/// Merge `records` (root level, nested) into `registry`.
///
/// On return the registry holds exactly the snapshot's containers in visit
/// order; callers re-sort it afterwards.
pub fn reconcile(registry: &mut ContainerRegistry, records: &[ContainerRecord]) -> ReconcileOutcome {
    let mut pass = Pass {
        registry,
        order: Vec::new(),
        seen: HashSet::new(),
        outcome: ReconcileOutcome::default(),
    };

    let changed = pass.merge_level(records, None);
    let Pass {
        registry,
        order,
        seen,
        mut outcome,
    } = pass;

    outcome.removed_ids = registry
        .ids()
        .iter()
        .copied()
        .filter(|id| !seen.contains(id))
        .collect();

    let nodes = registry.nodes_mut();
    for id in &outcome.removed_ids {
        nodes.remove(id);
    }
    registry.replace_order(order);

    // a pure removal produces no per-container change
    outcome.changed = changed || !outcome.removed_ids.is_empty();

    debug!(
        total = registry.len(),
        changed = outcome.changed_ids.len(),
        created = outcome.created_ids.len(),
        removed = outcome.removed_ids.len(),
        "Snapshot reconciled"
    );
    outcome
}
