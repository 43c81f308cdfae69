//! The load orchestrator: ingests one package at a time into a [`Registry`].
//!
//! A package is loaded in a fixed order:
//!
//! 1. every file under `systems/` (the file stem is the system id);
//! 2. every file under `bodies/` (and the legacy `planets/` folder);
//! 3. the optional addon manifest, once per package;
//! 4. the optional translation files under `translations/`.
//!
//! A failure in one file is logged, recorded in [`Diagnostics`] and the
//! package report, and never stops the remaining files from loading. A
//! missing folder means the package contributes nothing of that kind.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use horizons_core::BodyId;
use horizons_core::Registry;
use horizons_core::config::{PlanetConfig, StarSystemConfig};
use horizons_core::diagnostics::{Diagnostics, FailedConfig, FailureKind};
use horizons_core::migration::MigrationContext;
use horizons_core::package::Package;
use horizons_core::validation::{ConfigValidator, StandardValidator};

use crate::addon::{ADDON_MANIFEST_NAME, AddonManifest, AddonRegistry};
use crate::loader::{
    DataLoadError, collect_data_files, deserialize_file, file_stem, find_data_file,
};
use crate::translation::{Language, TranslationConfig, TranslationTable};

pub const SYSTEMS_DIR: &str = "systems";
pub const BODIES_DIR: &str = "bodies";
/// Older packages keep their bodies here.
pub const LEGACY_BODIES_DIR: &str = "planets";
pub const TRANSLATIONS_DIR: &str = "translations";

/// Outcome of loading one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReport {
    pub package: String,
    pub systems_loaded: usize,
    pub bodies_loaded: usize,
    pub addon_loaded: bool,
    pub translations_loaded: usize,
    pub failures: Vec<FailedConfig>,
}

impl PackageReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

fn failure_kind(err: &DataLoadError) -> FailureKind {
    match err {
        DataLoadError::UnsupportedFormat { .. }
        | DataLoadError::ConflictingFormats { .. }
        | DataLoadError::Parse { .. } => FailureKind::Parse,
        DataLoadError::Validation(_) => FailureKind::Validation,
        DataLoadError::Registry(_) => FailureKind::DuplicateRegistration,
        DataLoadError::Io(_) => FailureKind::Io,
    }
}

/// Drives package ingestion and owns the tables that sit beside the registry.
pub struct ContentLoader {
    validator: Box<dyn ConfigValidator>,
    translations: TranslationTable,
    addons: AddonRegistry,
    diagnostics: Diagnostics,
    mounted: Vec<Arc<Package>>,
    initial_load_done: bool,
}

impl std::fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentLoader")
            .field("addons", &self.addons.len())
            .field("failures", &self.diagnostics.len())
            .field("mounted", &self.mounted.len())
            .field("initial_load_done", &self.initial_load_done)
            .finish_non_exhaustive()
    }
}

impl Default for ContentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentLoader {
    pub fn new() -> Self {
        Self::with_validator(Box::new(StandardValidator))
    }

    pub fn with_validator(validator: Box<dyn ConfigValidator>) -> Self {
        Self {
            validator,
            translations: TranslationTable::new(),
            addons: AddonRegistry::new(),
            diagnostics: Diagnostics::new(),
            mounted: Vec::new(),
            initial_load_done: false,
        }
    }

    // -----------------------------------------------------------------------
    // Package loading
    // -----------------------------------------------------------------------

    /// Load every package in order and mark the initial load as finished.
    pub fn load_all(&mut self, registry: &mut Registry, packages: &[Arc<Package>]) -> Vec<PackageReport> {
        let reports = packages
            .iter()
            .map(|p| self.load_package(registry, p))
            .collect();
        self.finish_initial_load();
        reports
    }

    /// Load one package into `registry`.
    pub fn load_package(&mut self, registry: &mut Registry, package: &Arc<Package>) -> PackageReport {
        let mut report = PackageReport {
            package: package.unique_name.clone(),
            ..Default::default()
        };
        info!(package = package.unique_name.as_str(), "loading package");

        for path in self.files_in(package, &[SYSTEMS_DIR]) {
            debug!(file = %path.display(), "loading system");
            match self.load_system_file(registry, package, &path) {
                Ok(_) => report.systems_loaded += 1,
                Err(e) => self.fail(&mut report, package, &path, e),
            }
        }

        for path in self.files_in(package, &[BODIES_DIR, LEGACY_BODIES_DIR]) {
            debug!(file = %path.display(), "loading body");
            match self.load_body_file(registry, package, &path) {
                Ok(_) => report.bodies_loaded += 1,
                Err(e) => self.fail(&mut report, package, &path, e),
            }
        }

        self.load_addon_manifest(package, &mut report);
        self.load_translations(package, &mut report);

        if !self.initial_load_done && !self.mounted.iter().any(|p| p.unique_name == package.unique_name) {
            self.mounted.push(Arc::clone(package));
        }
        report
    }

    /// Content files in the given package folders. Unreadable folders count
    /// as empty.
    fn files_in(&self, package: &Package, dirs: &[&str]) -> Vec<std::path::PathBuf> {
        let mut files = Vec::new();
        for dir in dirs {
            match collect_data_files(&package.resolve(dir)) {
                Ok(found) => files.extend(found),
                Err(e) => warn!(
                    package = package.unique_name.as_str(),
                    dir = *dir,
                    error = %e,
                    "could not read folder"
                ),
            }
        }
        files
    }

    fn fail(&mut self, report: &mut PackageReport, package: &Package, path: &Path, err: DataLoadError) {
        error!(
            package = package.unique_name.as_str(),
            file = %path.display(),
            error = %err,
            "failed to load config"
        );
        let failure = FailedConfig {
            file: package.relative_path(path),
            package: Some(package.unique_name.clone()),
            kind: failure_kind(&err),
            detail: err.to_string(),
        };
        self.diagnostics.record(failure.clone());
        report.failures.push(failure);
    }

    fn load_addon_manifest(&mut self, package: &Arc<Package>, report: &mut PackageReport) {
        if self.addons.contains(&package.unique_name) {
            return;
        }
        let result = find_data_file(&package.root, ADDON_MANIFEST_NAME).and_then(|found| {
            found
                .map(|path| deserialize_file::<AddonManifest>(&path))
                .transpose()
        });
        match result {
            Ok(Some(manifest)) => {
                report.addon_loaded = self.addons.insert(&package.unique_name, manifest);
            }
            Ok(None) => {}
            Err(e) => {
                let path = package.resolve(ADDON_MANIFEST_NAME);
                self.fail(report, package, &path, e);
            }
        }
    }

    fn load_translations(&mut self, package: &Arc<Package>, report: &mut PackageReport) {
        let dir = package.resolve(TRANSLATIONS_DIR);
        if !dir.is_dir() {
            return;
        }
        for language in Language::ALL {
            let loaded = find_data_file(&dir, language.file_name()).and_then(|found| {
                found
                    .map(|path| deserialize_file::<TranslationConfig>(&path))
                    .transpose()
            });
            match loaded {
                Ok(Some(config)) => {
                    self.translations.add(language, config);
                    report.translations_loaded += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    let path = dir.join(language.file_name());
                    self.fail(report, package, &path, e);
                }
            }
        }
        if report.translations_loaded == 0 {
            warn!(
                package = package.unique_name.as_str(),
                "translations folder has no usable translation files"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Single-file registration
    // -----------------------------------------------------------------------

    /// Load a system file; its stem is the system id. Returns the id.
    pub fn load_system_file(
        &mut self,
        registry: &mut Registry,
        package: &Arc<Package>,
        path: &Path,
    ) -> Result<String, DataLoadError> {
        let id = file_stem(path)
            .ok_or_else(|| DataLoadError::UnsupportedFormat {
                file: path.to_path_buf(),
            })?
            .to_string();
        let config: StarSystemConfig = deserialize_file(path)?;
        let relative_path = package.relative_path(path);
        self.register_system(registry, &id, config, &relative_path, Some(Arc::clone(package)))?;
        Ok(id)
    }

    /// Load a body file.
    pub fn load_body_file(
        &mut self,
        registry: &mut Registry,
        package: &Arc<Package>,
        path: &Path,
    ) -> Result<BodyId, DataLoadError> {
        let config: PlanetConfig = deserialize_file(path)?;
        let relative_path = package.relative_path(path);
        self.register_body(registry, config, &relative_path, Some(Arc::clone(package)))
    }

    /// Register an already-parsed system. Usable at any time, not only
    /// during a package load.
    pub fn register_system(
        &mut self,
        registry: &mut Registry,
        id: &str,
        mut config: StarSystemConfig,
        relative_path: &str,
        package: Option<Arc<Package>>,
    ) -> Result<(), DataLoadError> {
        self.validator.fix_coordinates(&mut config);
        registry.register_system(id, config, relative_path, package)?;
        Ok(())
    }

    /// Migrate, validate and register an already-parsed body. Usable at any
    /// time, not only during a package load.
    ///
    /// If the body names a system that is not registered yet, the package's
    /// own `systems/` folder is searched for it first.
    pub fn register_body(
        &mut self,
        registry: &mut Registry,
        mut config: PlanetConfig,
        relative_path: &str,
        package: Option<Arc<Package>>,
    ) -> Result<BodyId, DataLoadError> {
        let ctx = MigrationContext {
            package: package.as_deref().map(|p| p.unique_name.as_str()),
        };
        registry.migrator().migrate_body(&mut config, &ctx);
        self.validator.validate(&config)?;

        if !registry.contains_system(&config.star_system) {
            if let Some(package) = &package {
                self.load_sibling_system(registry, package, &config.star_system);
            }
        }

        Ok(registry.register_body(config, relative_path, package)?)
    }

    /// Look for `systems/<id>` in `package` and register it if present.
    fn load_sibling_system(&mut self, registry: &mut Registry, package: &Arc<Package>, id: &str) {
        let dir = package.resolve(SYSTEMS_DIR);
        let path = match find_data_file(&dir, id) {
            Ok(Some(path)) => path,
            Ok(None) => return,
            Err(e) => {
                warn!(system = id, error = %e, "could not look up system file");
                return;
            }
        };
        warn!(
            system = id,
            package = package.unique_name.as_str(),
            "system referenced before it was loaded; loading it now"
        );
        if let Err(e) = self.load_system_file(registry, package, &path) {
            warn!(system = id, error = %e, "could not load referenced system");
        }
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    /// Stop recording newly loaded packages as mounted addons.
    pub fn finish_initial_load(&mut self) {
        self.initial_load_done = true;
    }

    /// Clear translations, addons and diagnostics before a full reload.
    /// Mounted addons are kept.
    pub fn reset(&mut self) {
        self.translations.clear();
        self.addons.clear();
        self.diagnostics.clear();
    }

    pub fn translations(&self) -> &TranslationTable {
        &self.translations
    }

    pub fn addons(&self) -> &AddonRegistry {
        &self.addons
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Packages loaded during the initial bulk load.
    pub fn mounted_addons(&self) -> &[Arc<Package>] {
        &self.mounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizons_core::test_utils::{cleanup, make_test_dir};
    use std::fs;

    fn make_package(dir: &Path, name: &str) -> Arc<Package> {
        let root = dir.join(name);
        fs::create_dir_all(&root).unwrap();
        Arc::new(Package::new(name, name, root))
    }

    fn write(package: &Package, rel: &str, content: &str) {
        let path = package.resolve(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn empty_package_contributes_nothing() {
        let dir = make_test_dir("orch_empty");
        let package = make_package(&dir, "Empty");
        let mut registry = Registry::new();
        let mut loader = ContentLoader::new();

        let report = loader.load_package(&mut registry, &package);
        assert!(report.is_clean());
        assert_eq!(report.systems_loaded + report.bodies_loaded, 0);
        assert_eq!(registry.system_count(), 2);
        cleanup(&dir);
    }

    #[test]
    fn bad_file_does_not_stop_package() {
        let dir = make_test_dir("orch_isolation");
        let package = make_package(&dir, "P");
        write(&package, "bodies/a.json", r#"{"name": "a", "star_system": "Alpha"}"#);
        write(&package, "bodies/b.json", "{ broken");
        write(&package, "bodies/c.json", r#"{"name": "", "star_system": "Alpha"}"#);
        write(&package, "bodies/d.json", r#"{"name": "d", "star_system": "Alpha"}"#);

        let mut registry = Registry::new();
        let mut loader = ContentLoader::new();
        let report = loader.load_package(&mut registry, &package);

        assert_eq!(report.bodies_loaded, 2);
        assert_eq!(registry.body_names_of("Alpha"), vec!["a", "d"]);
        let kinds: Vec<_> = report.failures.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FailureKind::Parse, FailureKind::Validation]);
        assert_eq!(loader.diagnostics().failed_file_names(), vec!["bodies/b.json", "bodies/c.json"]);
        cleanup(&dir);
    }

    #[test]
    fn legacy_planets_folder_is_read() {
        let dir = make_test_dir("orch_planets");
        let package = make_package(&dir, "P");
        write(&package, "planets/rock.json", r#"{"name": "rock", "star_system": "Alpha"}"#);

        let mut registry = Registry::new();
        let report = ContentLoader::new().load_package(&mut registry, &package);
        assert_eq!(report.bodies_loaded, 1);
        assert_eq!(registry.body_names_of("Alpha"), vec!["rock"]);
        cleanup(&dir);
    }

    #[test]
    fn sibling_system_is_loaded_on_demand() {
        let dir = make_test_dir("orch_sibling");
        let package = make_package(&dir, "P");
        write(&package, "systems/Alpha.json", r#"{"travel_audio": "alpha.wav"}"#);

        let mut registry = Registry::new();
        let mut loader = ContentLoader::new();
        loader
            .register_body(
                &mut registry,
                PlanetConfig::new("rock", "Alpha"),
                "bodies/rock.json",
                Some(package.clone()),
            )
            .unwrap();

        let alpha = registry.system("Alpha").unwrap();
        assert_eq!(alpha.config.travel_audio.as_deref(), Some("alpha.wav"));
        assert_eq!(alpha.relative_path, "systems/Alpha.json");
        cleanup(&dir);
    }

    #[test]
    fn system_coordinates_are_fixed() {
        let dir = make_test_dir("orch_coords");
        let package = make_package(&dir, "P");
        write(
            &package,
            "systems/Alpha.json",
            r#"{"vessel": {"coords": {"x": [0, 0, 7], "y": [1], "z": [2]}}}"#,
        );

        let mut registry = Registry::new();
        ContentLoader::new().load_package(&mut registry, &package);
        let coords = registry.system("Alpha").unwrap().config.vessel_coords().unwrap().clone();
        assert_eq!(coords.x, vec![0]);
        cleanup(&dir);
    }

    #[test]
    fn addon_and_translations() {
        let dir = make_test_dir("orch_addon");
        let package = make_package(&dir, "P");
        write(&package, "addon-manifest.json", r#"{"credits": ["CREDIT"]}"#);
        write(&package, "translations/english.json", r#"{"ui_dictionary": {"CREDIT": "Me"}}"#);
        write(&package, "translations/german.json", r#"{"ui_dictionary": {"CREDIT": "Ich"}}"#);

        let mut registry = Registry::new();
        let mut loader = ContentLoader::new();
        let report = loader.load_package(&mut registry, &package);

        assert!(report.addon_loaded);
        assert_eq!(report.translations_loaded, 2);
        assert_eq!(
            loader.addons().credits("P", loader.translations(), Language::German),
            vec!["Ich"]
        );
        cleanup(&dir);
    }

    #[test]
    fn mounted_addons_only_during_initial_load() {
        let dir = make_test_dir("orch_mounted");
        let first = make_package(&dir, "First");
        let late = make_package(&dir, "Late");

        let mut registry = Registry::new();
        let mut loader = ContentLoader::new();
        loader.load_all(&mut registry, &[first]);
        loader.load_package(&mut registry, &late);

        let names: Vec<_> = loader.mounted_addons().iter().map(|p| p.unique_name.as_str()).collect();
        assert_eq!(names, vec!["First"]);
        cleanup(&dir);
    }
}
