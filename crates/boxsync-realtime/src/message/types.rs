//! Messages pushed by the device.

use serde::{Deserialize, Serialize};

use boxsync_entity::container::ContainerChangePush;

/// A message from the device's push channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PushMessage {
    /// Containers were added, changed, or deleted.
    ContainerChange(ContainerChangePush),
    /// The device database was (re)initialized.
    DbInitializationReady,
}

impl PushMessage {
    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContainerChange(_) => "container_change",
            Self::DbInitializationReady => "db_initialization_ready",
        }
    }
}
