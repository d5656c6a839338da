//! Device capability and user lookups needed by container policy.

/// Limits and modes reported by the device.
pub trait DeviceCapabilities: Send + Sync + std::fmt::Debug + 'static {
    /// Maximum number of folders directly below the HDD container.
    fn hdd_folder_max(&self) -> Option<usize>;

    /// Maximum number of secure boxes.
    fn secure_box_max(&self) -> Option<usize>;

    /// Whether the device runs without user authentication.
    fn is_user_auth_off(&self) -> bool;

    /// Whether the hold container has reached its job limit for the
    /// device's current rip-after-upload mode.
    fn is_hold_jobs_limit_reached(&self) -> bool;
}

/// The user the client session belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    /// Login name; matches the name of the user's own HDD folder.
    pub username: String,
    /// Guest session without authentication.
    pub non_auth: bool,
    /// Whether the user may create boxes and upload jobs.
    pub can_create_user_box: bool,
}
