//! Container classification enums, serialized as the device spells them.

use serde::{Deserialize, Serialize};

/// What a container holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerType {
    /// Jobs waiting to be processed.
    Active,
    /// Held jobs shown inside the active list.
    ActiveHold,
    /// Processed jobs.
    Finished,
    /// Jobs on hold.
    Hold,
    /// Hard-disk storage (folders and boxes).
    Hdd,
    /// Password protected storage.
    Secure,
}

/// Structural role of a storage container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoxType {
    /// Not a user storage container.
    #[default]
    None,
    /// Intermediate container holding boxes.
    Folder,
    /// Leaf container holding jobs.
    Box,
}

/// Lock state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LockState {
    /// Contents are accessible.
    #[default]
    Off,
    /// Contents require a password.
    On,
}

impl LockState {
    /// Whether the state is [`LockState::On`].
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}
