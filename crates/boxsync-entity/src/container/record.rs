//! Container records as delivered by the device.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use boxsync_core::error::AppError;
use boxsync_core::types::ContainerId;

use super::kind::{BoxType, ContainerType, LockState};

/// One container in a snapshot, with its children nested below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    /// Container id.
    pub container_id: ContainerId,
    /// Display name.
    pub name: String,
    /// What the container holds.
    #[serde(rename = "type")]
    pub container_type: ContainerType,
    /// Folder, box, or neither.
    #[serde(default)]
    pub box_type: BoxType,
    /// Lock state.
    #[serde(default)]
    pub locked: LockState,
    /// Number of jobs stored directly in the container.
    #[serde(default)]
    pub job_count: u32,
    /// Child containers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub container_list: Vec<ContainerRecord>,
}

impl ContainerRecord {
    /// Create a childless record with default box type, lock, and job count.
    pub fn new(id: impl Into<ContainerId>, name: impl Into<String>, container_type: ContainerType) -> Self {
        Self {
            container_id: id.into(),
            name: name.into(),
            container_type,
            box_type: BoxType::None,
            locked: LockState::Off,
            job_count: 0,
            container_list: Vec::new(),
        }
    }

    /// Builder-style setter for the box type.
    pub fn with_box_type(mut self, box_type: BoxType) -> Self {
        self.box_type = box_type;
        self
    }

    /// Builder-style setter for the lock state.
    pub fn with_locked(mut self, locked: LockState) -> Self {
        self.locked = locked;
        self
    }

    /// Builder-style setter for the job count.
    pub fn with_job_count(mut self, job_count: u32) -> Self {
        self.job_count = job_count;
        self
    }

    /// Builder-style setter for the nested children.
    pub fn with_children(mut self, children: Vec<ContainerRecord>) -> Self {
        self.container_list = children;
        self
    }
}

/// Full snapshot response of the container endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerListResponse {
    /// Root-level containers.
    #[serde(default)]
    pub container_list: Vec<ContainerRecord>,
}

impl ContainerListResponse {
    /// Check structural constraints serde cannot express: every id appears
    /// once across the whole tree and no name is blank.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&ContainerRecord> = self.container_list.iter().collect();

        while let Some(record) = stack.pop() {
            if !seen.insert(record.container_id) {
                return Err(AppError::validation(format!(
                    "Duplicate container id {} in snapshot",
                    record.container_id
                )));
            }
            if record.name.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Container {} has an empty name",
                    record.container_id
                )));
            }
            stack.extend(record.container_list.iter());
        }

        Ok(())
    }
}
