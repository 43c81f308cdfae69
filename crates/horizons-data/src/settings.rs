//! Loading user settings with the same format detection as content files.

use std::path::Path;

use tracing::debug;

use horizons_core::settings::Settings;

use crate::loader::{DataLoadError, deserialize_file, find_data_file};

/// Base name of the settings file.
pub const SETTINGS_NAME: &str = "settings";

/// Read `settings.{json,ron,toml}` from `dir`. A missing file gives the
/// default settings.
pub fn load_settings(dir: &Path) -> Result<Settings, DataLoadError> {
    match find_data_file(dir, SETTINGS_NAME)? {
        Some(path) => {
            debug!(path = %path.display(), "loading settings");
            deserialize_file(&path)
        }
        None => Ok(Settings::default()),
    }
}
