//! Logging configuration for the agent binary.

use serde::{Deserialize, Serialize};

/// How the agent writes its log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"info,boxsync_service=debug"`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,
    /// `"json"` for one object per line, anything else for human output.
    #[serde(default = "default_format")]
    pub format: String,
    /// Include the module path of each event.
    #[serde(default = "default_true")]
    pub target: bool,
    /// Colorize human output.
    #[serde(default = "default_true")]
    pub ansi: bool,
}

impl LoggingConfig {
    /// Whether the JSON formatter is selected.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            target: true,
            ansi: true,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}
