//! Id-indexed container tree.
//!
//! The registry owns every [`Container`] by id. Parent and child links are
//! ids resolved through the registry, and `order` holds the canonical flat
//! listing: root-first, depth-first, siblings sorted.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tracing::warn;

use boxsync_core::types::ContainerId;
use boxsync_entity::container::Container;

/// The container forest plus its flat order.
#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    /// Every container, by id.
    nodes: HashMap<ContainerId, Container>,
    /// Canonical flat order of all ids in `nodes`.
    order: Vec<ContainerId>,
}

impl ContainerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry holds no containers.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: ContainerId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Look up a container.
    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.nodes.get(&id)
    }

    /// Look up a container for in-place mutation of its fields.
    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.nodes.get_mut(&id)
    }

    /// Ids in canonical order.
    pub fn ids(&self) -> &[ContainerId] {
        &self.order
    }

    /// Containers in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Cloned containers in canonical order.
    pub fn snapshot(&self) -> Vec<Container> {
        self.iter().cloned().collect()
    }

    /// Cloned children of `id` in display order.
    pub fn children_of(&self, id: ContainerId) -> Vec<Container> {
        self.get(id)
            .map(|parent| {
                parent
                    .children()
                    .iter()
                    .filter_map(|c| self.nodes.get(c).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First child of `parent` named `name`.
    pub fn find_child_by_name(&self, parent: ContainerId, name: &str) -> Option<&Container> {
        self.get(parent)?
            .children()
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .find(|c| c.name() == name)
    }

    /// Add an unlinked container at the end of the order.
    ///
    /// Returns `false` and leaves the registry untouched if the id exists.
    pub fn insert(&mut self, container: Container) -> bool {
        let id = container.id();
        if self.nodes.contains_key(&id) {
            return false;
        }
        self.nodes.insert(id, container);
        self.order.push(id);
        true
    }

    /// Attach `child` below `parent`, detaching it from any previous parent.
    pub fn link(&mut self, parent: ContainerId, child: ContainerId) -> bool {
        if parent == child || !self.contains(parent) || self.is_descendant(parent, child) {
            return false;
        }
        self.unlink(child);
        let Some(node) = self.nodes.get_mut(&child) else {
            return false;
        };
        node.set_parent(Some(parent));
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.add_child(child);
        }
        true
    }

    /// Detach `child` from its parent, making it a root.
    pub fn unlink(&mut self, child: ContainerId) {
        let Some(parent) = self.nodes.get(&child).and_then(Container::parent) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.remove_child(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.set_parent(None);
        }
    }

    /// Remove `id` and all of its descendants. Returns the removed ids,
    /// `id` first.
    pub fn remove_subtree(&mut self, id: ContainerId) -> Vec<ContainerId> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.unlink(id);

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children().iter().rev().copied());
                removed.push(current);
            }
        }

        let gone: HashSet<ContainerId> = removed.iter().copied().collect();
        self.order.retain(|id| !gone.contains(id));
        removed
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_descendant(&self, id: ContainerId, ancestor: ContainerId) -> bool {
        let mut current = self.get(id).and_then(Container::parent);
        // bounded walk: a corrupted parent chain must not loop forever
        for _ in 0..=self.nodes.len() {
            match current {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => current = self.get(parent).and_then(Container::parent),
                None => return false,
            }
        }
        false
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestry(&self, id: ContainerId) -> Vec<ContainerId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).map(Container::id);
        while let Some(node) = current {
            if chain.contains(&node) {
                break;
            }
            chain.push(node);
            current = self.get(node).and_then(Container::parent);
        }
        chain
    }

    /// Rebuild the canonical order.
    ///
    /// Roots keep their current relative order; each root is followed by
    /// its children, recursively, stable-sorted by `key`. Containers that
    /// cannot be reached from a root are promoted to roots.
    pub fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord + Clone,
        F: FnMut(&Container) -> K,
    {
        let roots: Vec<ContainerId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.nodes.get(id).is_some_and(Container::is_root))
            .collect();

        let mut sorted = Vec::with_capacity(self.nodes.len());
        let mut visited = HashSet::with_capacity(self.nodes.len());
        for root in roots {
            self.emit_sorted(root, &mut key, &mut sorted, &mut visited);
        }

        if sorted.len() != self.nodes.len() {
            let stranded: Vec<ContainerId> = self
                .order
                .iter()
                .copied()
                .filter(|id| !visited.contains(id))
                .collect();
            for id in stranded {
                if visited.contains(&id) {
                    continue;
                }
                warn!(container_id = %id, "Container unreachable from any root, promoting to root");
                self.unlink(id);
                self.emit_sorted(id, &mut key, &mut sorted, &mut visited);
            }
        }

        self.order = sorted;
    }

    /// Sort siblings by case-insensitive name.
    pub fn sort_by_name(&mut self) {
        self.sort_by_key(|c| c.name().to_lowercase());
    }

    fn emit_sorted<K, F>(
        &mut self,
        id: ContainerId,
        key: &mut F,
        out: &mut Vec<ContainerId>,
        visited: &mut HashSet<ContainerId>,
    ) where
        K: Ord + Clone,
        F: FnMut(&Container) -> K,
    {
        if !visited.insert(id) {
            return;
        }
        out.push(id);

        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let keys: HashMap<ContainerId, K> = node
            .children()
            .iter()
            .filter_map(|c| self.nodes.get(c).map(|child| (*c, key(child))))
            .collect();

        let children = match self.nodes.get_mut(&id) {
            Some(node) => node.sort_children_by_key(|c| keys.get(c).cloned()).to_vec(),
            None => return,
        };
        for child in children {
            self.emit_sorted(child, key, out, visited);
        }
    }

    /// Describe every broken link or duplicate; empty when the tree is
    /// consistent.
    pub fn consistency_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let unique: HashSet<ContainerId> = self.order.iter().copied().collect();
        if unique.len() != self.order.len() {
            errors.push("order lists an id more than once".to_string());
        }
        if unique.len() != self.nodes.len() || !self.nodes.keys().all(|id| unique.contains(id)) {
            errors.push("order and node map disagree".to_string());
        }

        for node in self.nodes.values() {
            if let Some(parent) = node.parent() {
                match self.nodes.get(&parent) {
                    None => errors.push(format!("{} has dangling parent {parent}", node.id())),
                    Some(p) => {
                        let count = p.children().iter().filter(|c| **c == node.id()).count();
                        if count != 1 {
                            errors.push(format!(
                                "{} listed {count} times by parent {parent}",
                                node.id()
                            ));
                        }
                    }
                }
            }
            for child in node.children() {
                match self.nodes.get(child) {
                    None => errors.push(format!("{} has dangling child {child}", node.id())),
                    Some(c) if c.parent() != Some(node.id()) => {
                        errors.push(format!("{child} is listed by {} but not its child", node.id()))
                    }
                    Some(_) => {}
                }
            }
        }
        errors
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut HashMap<ContainerId, Container> {
        &mut self.nodes
    }

    pub(crate) fn replace_order(&mut self, order: Vec<ContainerId>) {
        self.order = order;
    }
}

/// A registry shared between the controller, the sweeper, and readers.
///
/// Access goes through closures so the lock can never be held across an
/// `.await`; every mutation is atomic from an observer's point of view.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<ContainerRegistry>>,
}

impl SharedRegistry {
    /// Create an empty shared registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&ContainerRegistry) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut ContainerRegistry) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}
