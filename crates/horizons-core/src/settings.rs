//! User-facing settings.

use serde::{Deserialize, Serialize};
use tracing::Level;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Developer diagnostics (logs at info level).
    pub debug: bool,
    /// Per-file load messages (logs at debug level).
    pub verbose_logs: bool,
    /// Start in this system instead of the declared default, if it exists.
    pub default_system_override: Option<String>,
    pub custom_title_screen: bool,
    /// Write body caches back to disk when a system unloads.
    pub write_body_caches: bool,
}

impl Settings {
    /// Maximum log level implied by the verbosity flags.
    pub fn log_level(&self) -> Level {
        if self.verbose_logs {
            Level::DEBUG
        } else if self.debug {
            Level::INFO
        } else {
            Level::WARN
        }
    }

    /// The override with blank values treated as unset.
    pub fn override_id(&self) -> Option<&str> {
        self.default_system_override
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
