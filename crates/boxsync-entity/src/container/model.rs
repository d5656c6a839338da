//! In-memory container entity.
//!
//! A [`Container`] is updated in place whenever the device reports the same
//! id again, so holders of an id always resolve to current state. Parent and
//! child links are ids; keeping both directions consistent is the job of
//! whoever owns the tree.

use serde::Serialize;

use boxsync_core::types::ContainerId;

use super::kind::{BoxType, ContainerType, LockState};
use super::push::ContainerPatch;
use super::record::ContainerRecord;

/// A node of the container tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    id: ContainerId,
    name: String,
    container_type: ContainerType,
    box_type: BoxType,
    locked: LockState,
    job_count: u32,
    parent: Option<ContainerId>,
    children: Vec<ContainerId>,
}

impl Container {
    /// Create an unlinked container from a record. Nested records are ignored.
    pub fn from_record(record: &ContainerRecord) -> Self {
        Self {
            id: record.container_id,
            name: record.name.clone(),
            container_type: record.container_type,
            box_type: record.box_type,
            locked: record.locked,
            job_count: record.job_count,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Merge the mutable fields of `record` (same id) into this container.
    ///
    /// Returns `true` if any field changed. Children are not touched.
    pub fn update(&mut self, record: &ContainerRecord) -> bool {
        debug_assert_eq!(self.id, record.container_id);

        let mut changed = false;
        if self.name != record.name {
            self.name = record.name.clone();
            changed = true;
        }
        if self.container_type != record.container_type {
            self.container_type = record.container_type;
            changed = true;
        }
        if self.box_type != record.box_type {
            self.box_type = record.box_type;
            changed = true;
        }
        if self.locked != record.locked {
            self.locked = record.locked;
            changed = true;
        }
        if self.job_count != record.job_count {
            self.job_count = record.job_count;
            changed = true;
        }
        changed
    }

    /// Apply the fields present in `patch`. Returns `true` if any changed.
    pub fn apply_patch(&mut self, patch: &ContainerPatch) -> bool {
        debug_assert_eq!(self.id, patch.container_id);

        let mut changed = false;
        if let Some(name) = &patch.name {
            if *name != self.name {
                self.name = name.clone();
                changed = true;
            }
        }
        if let Some(container_type) = patch.container_type {
            changed |= replace(&mut self.container_type, container_type);
        }
        if let Some(box_type) = patch.box_type {
            changed |= replace(&mut self.box_type, box_type);
        }
        if let Some(locked) = patch.locked {
            changed |= replace(&mut self.locked, locked);
        }
        if let Some(job_count) = patch.job_count {
            changed |= replace(&mut self.job_count, job_count);
        }
        changed
    }

    /// Container id.
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Container type.
    pub fn container_type(&self) -> ContainerType {
        self.container_type
    }

    /// Box type.
    pub fn box_type(&self) -> BoxType {
        self.box_type
    }

    /// Lock state.
    pub fn locked(&self) -> LockState {
        self.locked
    }

    /// Whether the container is locked.
    pub fn is_locked(&self) -> bool {
        self.locked.is_on()
    }

    /// Set the lock state. Returns `true` if it changed.
    pub fn set_locked(&mut self, locked: LockState) -> bool {
        replace(&mut self.locked, locked)
    }

    /// Number of jobs in the container.
    pub fn job_count(&self) -> u32 {
        self.job_count
    }

    /// Parent id, `None` for roots.
    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    /// Whether the container has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Set or clear the parent link.
    pub fn set_parent(&mut self, parent: Option<ContainerId>) {
        self.parent = parent;
    }

    /// Child ids in display order.
    pub fn children(&self) -> &[ContainerId] {
        &self.children
    }

    /// Append a child id. A child already present is not added twice.
    pub fn add_child(&mut self, child: ContainerId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Remove a child id. Returns `true` if it was present.
    pub fn remove_child(&mut self, child: ContainerId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != child);
        self.children.len() != before
    }

    /// Drop all child links.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Stable-sort the children by `key` and return the new order.
    pub fn sort_children_by_key<K, F>(&mut self, key: F) -> &[ContainerId]
    where
        K: Ord,
        F: FnMut(&ContainerId) -> K,
    {
        self.children.sort_by_cached_key(key);
        &self.children
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
