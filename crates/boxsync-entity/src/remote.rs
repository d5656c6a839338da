//! Boundary to the remote authority that owns the container tree.

use async_trait::async_trait;

use boxsync_core::result::AppResult;
use boxsync_core::types::ContainerId;

use crate::container::ContainerRecord;

/// Request/response operations on the device's containers.
///
/// Every method is a suspension point for the sync engine. Failures carry
/// a typed [`AppError`](boxsync_core::AppError), optionally with a
/// user-facing message from the device.
#[async_trait]
pub trait ContainerRemote: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the full, validated container tree (root level records).
    async fn fetch_containers(&self) -> AppResult<Vec<ContainerRecord>>;

    /// Lock a container.
    async fn lock(&self, id: ContainerId) -> AppResult<()>;

    /// Unlock a container. Returns the device's verdict on the password.
    async fn unlock(&self, id: ContainerId, password: &str) -> AppResult<bool>;

    /// Create a container named `name` below `parent`.
    async fn create(&self, parent: ContainerId, name: &str, password: Option<&str>)
    -> AppResult<()>;

    /// Rename a container.
    async fn rename(&self, id: ContainerId, name: &str) -> AppResult<()>;

    /// Delete a container.
    async fn delete(&self, id: ContainerId) -> AppResult<()>;

    /// Change a container's password.
    async fn set_password(
        &self,
        id: ContainerId,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()>;
}
