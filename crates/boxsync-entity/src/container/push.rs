//! Incremental container changes delivered over the push channel.

use serde::{Deserialize, Serialize};

use boxsync_core::types::ContainerId;

use super::kind::{BoxType, ContainerType, LockState};
use super::record::ContainerRecord;

/// Reference to a container by id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRef {
    /// Container id.
    pub container_id: ContainerId,
}

/// Partial container state: only the fields the device chose to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPatch {
    /// Container id.
    pub container_id: ContainerId,
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New container type.
    #[serde(default, rename = "type")]
    pub container_type: Option<ContainerType>,
    /// New box type.
    #[serde(default)]
    pub box_type: Option<BoxType>,
    /// New lock state.
    #[serde(default)]
    pub locked: Option<LockState>,
    /// New job count.
    #[serde(default)]
    pub job_count: Option<u32>,
}

impl ContainerPatch {
    /// A patch for `container_id` that changes nothing yet.
    pub fn new(container_id: ContainerId) -> Self {
        Self {
            container_id,
            name: None,
            container_type: None,
            box_type: None,
            locked: None,
            job_count: None,
        }
    }
}

/// A container created on the device, tagged with its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedContainer {
    /// The intended parent; absent or unknown parents make a root.
    #[serde(default)]
    pub parent_container_id: Option<ContainerId>,
    /// Full state of the new container.
    #[serde(flatten)]
    pub record: ContainerRecord,
}

impl AddedContainer {
    /// Partial view used when the container turns out to exist already.
    pub fn as_patch(&self) -> ContainerPatch {
        ContainerPatch {
            container_id: self.record.container_id,
            name: Some(self.record.name.clone()),
            container_type: Some(self.record.container_type),
            box_type: Some(self.record.box_type),
            locked: Some(self.record.locked),
            job_count: Some(self.record.job_count),
        }
    }
}

/// Payload of a pushed container change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContainerChangePush {
    /// Containers whose fields changed.
    #[serde(default)]
    pub changed: Vec<ContainerPatch>,
    /// Containers that were removed.
    #[serde(default)]
    pub deleted: Vec<ContainerRef>,
    /// Containers that were created.
    #[serde(default)]
    pub new: Vec<AddedContainer>,
}

impl ContainerChangePush {
    /// Whether the payload carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.deleted.is_empty() && self.new.is_empty()
    }
}
