//! Validated parameters for container mutations.

use serde::{Deserialize, Serialize};
use validator::Validate;

use boxsync_core::types::ContainerId;

/// Parameters for creating a folder or box below `parent`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateContainer {
    /// Parent container.
    pub parent: ContainerId,
    /// Name of the new container.
    #[validate(length(min = 1, max = 255, message = "Container name is required"))]
    pub name: String,
    /// Optional password protecting the new container.
    pub password: Option<String>,
}

/// Parameters for renaming a container.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameContainer {
    /// Container to rename.
    pub id: ContainerId,
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Container name is required"))]
    pub name: String,
}
