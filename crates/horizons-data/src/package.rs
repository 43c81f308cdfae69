//! Discovery of content packages in a mods directory.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use horizons_core::package::Package;

use crate::loader::{DataLoadError, deserialize_file, find_data_file};

/// Base name of the optional package manifest.
pub const MANIFEST_NAME: &str = "manifest";

/// Optional identity file at a package root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
    pub unique_name: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Read the identity of the package rooted at `dir`.
///
/// Without a manifest, the directory name is both the unique and display name.
pub fn load_package_info(dir: &Path) -> Result<Package, DataLoadError> {
    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let manifest = match find_data_file(dir, MANIFEST_NAME)? {
        Some(path) => deserialize_file::<PackageManifest>(&path)?,
        None => PackageManifest::default(),
    };

    let unique_name = manifest
        .unique_name
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| dir_name.clone());
    let name = manifest
        .name
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| unique_name.clone());
    debug!(
        package = unique_name.as_str(),
        version = manifest.version.as_deref().unwrap_or("unknown"),
        "found package"
    );
    Ok(Package::new(unique_name, name, dir))
}

/// Every package directory directly under `mods_dir`, sorted by unique name.
///
/// A package whose manifest cannot be read is skipped with a warning.
pub fn discover_packages(mods_dir: &Path) -> Result<Vec<Arc<Package>>, DataLoadError> {
    let mut packages = Vec::new();
    if !mods_dir.is_dir() {
        return Ok(packages);
    }
    for entry in std::fs::read_dir(mods_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        match load_package_info(&path) {
            Ok(package) => packages.push(Arc::new(package)),
            Err(e) => warn!(dir = %path.display(), error = %e, "skipping package"),
        }
    }
    packages.sort_by(|a, b| a.unique_name.cmp(&b.unique_name));
    Ok(packages)
}
