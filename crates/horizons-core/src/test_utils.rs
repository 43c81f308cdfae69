//! Shared test helpers. Compiled for tests and under the `test-utils` feature.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{PlanetConfig, SpawnModule};
use crate::package::Package;

/// A package rooted under a fake mods directory.
pub fn package(unique_name: &str) -> Arc<Package> {
    Arc::new(Package::new(
        unique_name,
        unique_name,
        PathBuf::from("/mods").join(unique_name),
    ))
}

/// A body config with just a name and system.
pub fn body(name: &str, system: &str) -> PlanetConfig {
    PlanetConfig::new(name, system)
}

/// A body config that declares itself the system's spawn point.
pub fn spawn_body(name: &str, system: &str) -> PlanetConfig {
    PlanetConfig {
        spawn: Some(SpawnModule::default()),
        ..PlanetConfig::new(name, system)
    }
}

/// Create a temporary directory with a unique name for test isolation.
pub fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "horizons_test_{suffix}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Clean up a test directory.
pub fn cleanup(dir: &Path) {
    let _ = std::fs::remove_dir_all(dir);
}
