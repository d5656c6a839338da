//! Locally initiated changes to the container tree.
//!
//! Every mutation goes to the remote first and then waits for a full reload,
//! so the tree callers observe afterwards reflects the device's view.

use tracing::{error, info, warn};
use validator::Validate;

use boxsync_core::error::AppError;
use boxsync_core::result::AppResult;
use boxsync_core::types::ContainerId;
use boxsync_entity::container::{Container, CreateContainer, RenameContainer};

use crate::autolock::lock_container;
use crate::controller::SyncController;
use crate::events::ContainerEvent;

const LOCK_FAILED_MESSAGE: &str = "Locking the container failed.";

impl SyncController {
    /// Lock a container, then reload.
    pub async fn lock(&self, id: ContainerId) -> AppResult<()> {
        self.ensure_known(id)?;
        let inner = &self.inner;
        lock_container(inner.remote.as_ref(), &inner.registry, &inner.events, id).await?;
        info!(container_id = %id, "Container locked");
        self.load().await;
        Ok(())
    }

    /// Like [`lock`](Self::lock), but a failure is also reported and
    /// announced as [`ContainerEvent::LockFailed`] with a message for the user.
    pub async fn lock_with_error_handling(&self, id: ContainerId) -> AppResult<()> {
        match self.lock(id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.inner.reporter.report("lock container", &e);
                let message = match &e.user_message {
                    Some(detail) => format!("{LOCK_FAILED_MESSAGE}\n{detail}"),
                    None => LOCK_FAILED_MESSAGE.to_string(),
                };
                self.inner
                    .events
                    .emit(ContainerEvent::LockFailed { id, message });
                Err(e)
            }
        }
    }

    /// Unlock a container with `password`, then reload.
    ///
    /// Returns the device's verdict. The container and its ancestors count as
    /// visited either way.
    pub async fn unlock(&self, id: ContainerId, password: &str) -> AppResult<bool> {
        self.ensure_known(id)?;
        let unlocked = self.inner.remote.unlock(id, password).await?;

        let ancestry = self.inner.registry.read(|reg| reg.ancestry(id));
        if let Err(e) = self.inner.access.record_access(&ancestry).await {
            self.inner.reporter.report("record container access", &e);
        }

        info!(container_id = %id, unlocked, "Container unlock requested");
        self.load().await;
        Ok(unlocked)
    }

    /// Create a container below `parent`, then reload.
    ///
    /// Returns the first child of `parent` named `name` after the reload, and
    /// announces it as [`ContainerEvent::ContainerCreated`].
    pub async fn create_container(
        &self,
        parent: ContainerId,
        name: &str,
        password: Option<&str>,
    ) -> AppResult<Option<Container>> {
        let request = CreateContainer {
            parent,
            name: name.to_string(),
            password: password.map(str::to_string),
        };
        request
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid container: {e}")))?;
        self.ensure_known(parent)?;

        self.inner
            .remote
            .create(request.parent, &request.name, request.password.as_deref())
            .await?;
        info!(parent_id = %parent, name = %request.name, "Container created");
        self.load().await;

        let created = self
            .inner
            .registry
            .read(|reg| reg.find_child_by_name(parent, &request.name).cloned());
        match &created {
            Some(container) => self
                .inner
                .events
                .emit(ContainerEvent::ContainerCreated(container.clone())),
            None => warn!(parent_id = %parent, name = %request.name, "Created container not found after reload"),
        }
        Ok(created)
    }

    /// Rename a container, then reload.
    ///
    /// The public folder directly below the HDD container keeps its name;
    /// renaming it is logged and otherwise ignored.
    pub async fn rename_container(&self, id: ContainerId, name: &str) -> AppResult<()> {
        let request = RenameContainer {
            id,
            name: name.to_string(),
        };
        request
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid container name: {e}")))?;

        let well_known = &self.inner.well_known;
        let is_public = self
            .inner
            .registry
            .read(|reg| {
                reg.get(id).map(|c| {
                    c.parent() == Some(well_known.hdd) && c.name() == well_known.public_folder_name
                })
            })
            .ok_or_else(|| AppError::not_found(format!("Container {id} not found")))?;
        if is_public {
            error!(container_id = %id, "The public folder below HDD may not be renamed");
            return Ok(());
        }

        self.inner.remote.rename(id, &request.name).await?;
        info!(container_id = %id, name = %request.name, "Container renamed");
        self.load().await;

        if let Some(container) = self.container(id) {
            self.inner
                .events
                .emit(ContainerEvent::ContainerRenamed(container));
        }
        Ok(())
    }

    /// Delete a container, then reload.
    pub async fn delete_container(&self, id: ContainerId) -> AppResult<()> {
        self.ensure_known(id)?;
        self.inner.remote.delete(id).await?;
        info!(container_id = %id, "Container deleted");
        self.load().await;
        Ok(())
    }

    /// Change a container's password.
    pub async fn set_password(&self, id: ContainerId, old_password: &str, new_password: &str) -> AppResult<()> {
        self.ensure_known(id)?;
        self.inner
            .remote
            .set_password(id, old_password, new_password)
            .await?;
        info!(container_id = %id, "Container password changed");
        Ok(())
    }

    /// Mark `id` and all its ancestors as visited now.
    pub async fn record_access(&self, id: ContainerId) -> AppResult<()> {
        let ancestry = self.inner.registry.read(|reg| reg.ancestry(id));
        if ancestry.is_empty() {
            return Err(AppError::not_found(format!("Container {id} not found")));
        }
        self.inner.access.record_access(&ancestry).await
    }

    fn ensure_known(&self, id: ContainerId) -> AppResult<()> {
        if self.inner.registry.read(|reg| reg.contains(id)) {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Container {id} not found")))
        }
    }
}
