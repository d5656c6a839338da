//! Access-timestamp store configuration.

use serde::{Deserialize, Serialize};

/// Backend holding the last-access map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Provider type: `"memory"` or `"file"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Directory for the `"file"` provider.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Key under which the access map is persisted.
    #[serde(default = "default_key")]
    pub key: String,
    /// Maximum entries kept by the `"memory"` provider.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            directory: default_directory(),
            key: default_key(),
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_directory() -> String {
    "data/store".to_string()
}

fn default_key() -> String {
    "containersLastAccess".to_string()
}

fn default_max_capacity() -> u64 {
    1_000
}
