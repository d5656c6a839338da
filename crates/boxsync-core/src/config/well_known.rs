//! Fixed containers every device exposes.

use serde::{Deserialize, Serialize};

use crate::types::ContainerId;

/// Ids of the device's built-in containers and the name of the public folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellKnownConfig {
    /// Active job list.
    #[serde(default = "default_active")]
    pub active: ContainerId,
    /// Editable view of the active job list.
    #[serde(default = "default_editable_active")]
    pub editable_active: ContainerId,
    /// Finished jobs.
    #[serde(default = "default_finished")]
    pub finished: ContainerId,
    /// Held jobs.
    #[serde(default = "default_hold")]
    pub hold: ContainerId,
    /// Top-level HDD storage container.
    #[serde(default = "default_hdd")]
    pub hdd: ContainerId,
    /// Top-level secure storage container.
    #[serde(default = "default_secure")]
    pub secure: ContainerId,
    /// Name of the public folder directly below the HDD container.
    #[serde(default = "default_public_folder_name")]
    pub public_folder_name: String,
}

impl Default for WellKnownConfig {
    fn default() -> Self {
        Self {
            active: default_active(),
            editable_active: default_editable_active(),
            finished: default_finished(),
            hold: default_hold(),
            hdd: default_hdd(),
            secure: default_secure(),
            public_folder_name: default_public_folder_name(),
        }
    }
}

fn default_hdd() -> ContainerId {
    ContainerId(1)
}

fn default_secure() -> ContainerId {
    ContainerId(2)
}

fn default_active() -> ContainerId {
    ContainerId(3)
}

fn default_editable_active() -> ContainerId {
    ContainerId(4)
}

fn default_hold() -> ContainerId {
    ContainerId(5)
}

fn default_finished() -> ContainerId {
    ContainerId(6)
}

fn default_public_folder_name() -> String {
    "Public".to_string()
}
