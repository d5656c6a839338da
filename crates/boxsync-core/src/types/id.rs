//! Newtype wrapper for container identifiers.
//!
//! The remote authority numbers containers with plain integers. Wrapping
//! them prevents mixing a container id with a job count or a timestamp.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a container, stable for the container's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u32);

impl ContainerId {
    /// Create an identifier from its raw value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Return the raw value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContainerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self)
    }
}

impl From<u32> for ContainerId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ContainerId> for u32 {
    fn from(id: ContainerId) -> u32 {
        id.0
    }
}
