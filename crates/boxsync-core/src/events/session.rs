//! Session and connectivity events.

use serde::{Deserialize, Serialize};

use crate::types::ContainerId;

/// Events about the client session that may invalidate the container tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A user logged in.
    Login,
    /// The user logged out.
    Logout,
    /// The push socket closed; pushed changes may have been missed.
    SocketClosed,
    /// The job list of a container changed.
    JobListChanged {
        /// The container whose job list changed, if known.
        container_id: Option<ContainerId>,
        /// Whether the change was delivered over the push channel.
        from_push: bool,
    },
}

impl SessionEvent {
    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::SocketClosed => "socket_closed",
            Self::JobListChanged { .. } => "job_list_changed",
        }
    }
}
