//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod logging;
pub mod remote;
pub mod store;
pub mod sync;
pub mod well_known;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::remote::RemoteConfig;
pub use self::store::StoreConfig;
pub use self::sync::SyncConfig;
pub use self::well_known::WellKnownConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + environment overlay) and `BOXSYNC_` variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reload, poll, and auto-lock timing.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Remote authority endpoint settings.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Access-timestamp store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Ids and names of the device's fixed containers.
    #[serde(default)]
    pub well_known: WellKnownConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a config directory.
    ///
    /// Merges `{dir}/default.toml` with an environment-specific overlay
    /// `{dir}/{env}.toml` and environment variables prefixed with `BOXSYNC_`.
    /// Both files are optional; missing sections fall back to defaults.
    pub fn load(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BOXSYNC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
