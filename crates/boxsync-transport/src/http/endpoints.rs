//! Device endpoint paths and query parameter names.

/// Full container snapshot.
pub const CONTAINERS: &str = "/containers.fcgi";
/// Lock a container.
pub const LOCK: &str = "/containerLock.fcgi";
/// Unlock a container.
pub const UNLOCK: &str = "/containerUnlock.fcgi";
/// Create a container.
pub const CREATE: &str = "/containerCreate.fcgi";
/// Rename a container.
pub const RENAME: &str = "/containerRename.fcgi";
/// Delete a container.
pub const DELETE: &str = "/containerDelete.fcgi";
/// Change a container password.
pub const SET_PASSWORD: &str = "/containerSetPassword.fcgi";

pub const PARAM_CONTAINER_ID: &str = "containerId";
pub const PARAM_CONTAINER_NAME: &str = "containerName";
pub const PARAM_CONTAINER_PASSWORD: &str = "containerPassword";
pub const PARAM_OLD_PASSWORD: &str = "oldPassword";
pub const PARAM_NEW_PASSWORD: &str = "newPassword";
