//! What the current user may do with a container.
//!
//! Predicates are evaluated against the live tree; an unknown id is never
//! enabled for anything.

use std::sync::Arc;

use boxsync_core::config::WellKnownConfig;
use boxsync_core::traits::device::{DeviceCapabilities, UserContext};
use boxsync_core::types::ContainerId;
use boxsync_entity::container::{BoxType, Container, ContainerType};

use crate::registry::{ContainerRegistry, SharedRegistry};

/// Maximum number of boxes in an HDD folder.
pub const FOLDER_BOX_COUNT_MAX: usize = 1000;
/// Maximum number of jobs in an HDD folder.
pub const HDD_FOLDER_JOB_COUNT_MAX: u32 = 100;
/// Maximum number of jobs in an HDD box.
pub const HDD_BOX_JOB_COUNT_MAX: u32 = 1000;
/// Maximum number of jobs in a secure box.
pub const SECURE_BOX_JOB_COUNT_MAX: u32 = 1000;

/// Container permission and limit checks.
#[derive(Debug, Clone)]
pub struct ContainerPolicy {
    registry: SharedRegistry,
    well_known: WellKnownConfig,
    device: Arc<dyn DeviceCapabilities>,
    user: Option<UserContext>,
}

impl ContainerPolicy {
    /// Create a policy over `registry` with no logged-in user.
    pub fn new(
        registry: SharedRegistry,
        well_known: WellKnownConfig,
        device: Arc<dyn DeviceCapabilities>,
    ) -> Self {
        Self {
            registry,
            well_known,
            device,
            user: None,
        }
    }

    /// Replace the current user.
    pub fn set_user(&mut self, user: Option<UserContext>) {
        self.user = user;
    }

    /// The current user.
    pub fn user(&self) -> Option<&UserContext> {
        self.user.as_ref()
    }

    /// How many children the container may hold. `None` means unlimited.
    pub fn count_max(&self, id: ContainerId) -> Option<usize> {
        self.registry
            .read(|reg| reg.get(id).map(|c| self.count_max_of(c)))
            .unwrap_or(Some(0))
    }

    fn count_max_of(&self, c: &Container) -> Option<usize> {
        match c.container_type() {
            ContainerType::Secure => self.device.secure_box_max(),
            ContainerType::Hdd if c.id() == self.well_known.hdd => self.device.hdd_folder_max(),
            ContainerType::Hdd => Some(FOLDER_BOX_COUNT_MAX),
            _ => Some(0),
        }
    }

    /// Box type of a container created below `id`.
    pub fn new_container_box_type(&self, id: ContainerId) -> BoxType {
        self.registry.read(|reg| match reg.get(id) {
            Some(c) if c.container_type() == ContainerType::Secure => BoxType::Box,
            Some(c) if c.container_type() == ContainerType::Hdd && c.id() == self.well_known.hdd => {
                BoxType::Folder
            }
            Some(c) if c.container_type() == ContainerType::Hdd => BoxType::Box,
            _ => BoxType::None,
        })
    }

    /// Whether the container cannot take more jobs.
    pub fn is_at_max_jobs(&self, id: ContainerId) -> bool {
        self.registry.read(|reg| {
            let Some(c) = reg.get(id) else {
                return false;
            };
            match c.container_type() {
                ContainerType::Hdd => {
                    let max = if c.box_type() == BoxType::Folder {
                        HDD_FOLDER_JOB_COUNT_MAX
                    } else {
                        HDD_BOX_JOB_COUNT_MAX
                    };
                    c.job_count() >= max
                }
                ContainerType::Hold => self.device.is_hold_jobs_limit_reached(),
                ContainerType::Secure => c.is_root() || c.job_count() >= SECURE_BOX_JOB_COUNT_MAX,
                _ => false,
            }
        })
    }

    /// Whether a folder or box may be created below the container.
    pub fn is_create_enabled(&self, id: ContainerId) -> bool {
        self.registry.read(|reg| {
            let Some(c) = reg.get(id) else {
                return false;
            };
            let is_hdd = c.container_type() == ContainerType::Hdd;
            if is_hdd && c.is_root() && !self.device.is_user_auth_off() {
                return false;
            }

            // HDD root or its direct folders, or the secure root
            let grandparent = c.parent().and_then(|p| reg.get(p)).and_then(Container::parent);
            let placeable = c.id() == self.well_known.secure
                || (is_hdd && (c.is_root() || grandparent.is_none()));
            let below_max = self
                .count_max_of(c)
                .is_none_or(|max| c.children().len() < max);

            placeable && self.can_create_user_box() && !c.is_locked() && below_max
        })
    }

    /// Whether the container may be deleted.
    pub fn is_delete_enabled(&self, id: ContainerId) -> bool {
        self.with_container(id, |reg, c| {
            matches!(c.container_type(), ContainerType::Hdd | ContainerType::Secure)
                && !c.is_root()
                && !c.is_locked()
                && c.job_count() == 0
                && c.children().is_empty()
                && !self.is_public_folder_in(reg, c)
                && !self.is_user_folder_of(c)
        })
    }

    /// Whether the container may be renamed.
    pub fn is_rename_enabled(&self, id: ContainerId) -> bool {
        self.with_container(id, |reg, c| {
            c.container_type() == ContainerType::Hdd
                && !c.is_locked()
                && !c.is_root()
                && !self.is_public_folder_in(reg, c)
                && !self.is_user_folder_of(c)
        })
    }

    /// Whether the container can be locked.
    pub fn is_lock_enabled(&self, id: ContainerId) -> bool {
        self.with_container(id, |_, c| !c.is_locked())
    }

    /// Whether the container can be unlocked.
    pub fn is_unlock_enabled(&self, id: ContainerId) -> bool {
        self.with_container(id, |_, c| c.is_locked())
    }

    /// Whether jobs may be uploaded into the container.
    pub fn is_upload_enabled(&self, id: ContainerId) -> bool {
        if !self.can_create_user_box() {
            return false;
        }
        self.with_container(id, |_, c| match c.container_type() {
            ContainerType::Active | ContainerType::Finished => true,
            ContainerType::ActiveHold => false,
            ContainerType::Hdd | ContainerType::Hold => !c.is_locked(),
            ContainerType::Secure => !c.is_root() && !c.is_locked(),
        })
    }

    /// Whether the container is the public folder directly below HDD.
    pub fn is_public_folder(&self, id: ContainerId) -> bool {
        self.with_container(id, |reg, c| self.is_public_folder_in(reg, c))
    }

    /// Whether the container is the current user's own folder.
    pub fn is_user_folder(&self, id: ContainerId) -> bool {
        self.with_container(id, |_, c| self.is_user_folder_of(c))
    }

    fn with_container(&self, id: ContainerId, f: impl FnOnce(&ContainerRegistry, &Container) -> bool) -> bool {
        self.registry
            .read(|reg| reg.get(id).is_some_and(|c| f(reg, c)))
    }

    fn is_public_folder_in(&self, reg: &ContainerRegistry, c: &Container) -> bool {
        c.parent()
            .and_then(|p| reg.get(p))
            .is_some_and(|p| p.id() == self.well_known.hdd)
            && c.name() == self.well_known.public_folder_name
    }

    fn is_user_folder_of(&self, c: &Container) -> bool {
        self.user.as_ref().is_some_and(|user| {
            !user.non_auth && c.name() == user.username && c.box_type() == BoxType::Folder
        })
    }

    fn can_create_user_box(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.can_create_user_box)
    }
}
