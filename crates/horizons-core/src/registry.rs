//! The config registry: canonical system records and their ordered bodies.
//!
//! The registry is an explicitly owned value. A fresh registry (and one that
//! has been [`Registry::reset`]) always contains the two built-in systems.
//! Registration migrates every incoming config before storing it, so
//! deprecated fields never reach the canonical records.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::cache::{BodyCache, CacheError};
use crate::config::{NomaiCoordinates, PlanetConfig, StarSystemConfig, VesselModule};
use crate::defaults::DefaultSystemResolver;
use crate::id::{BodyId, EYE_SYSTEM, PRIMARY_SYSTEM, RuntimeHandle};
use crate::merge::Merge;
use crate::migration::{MigrationContext, Migrator};
use crate::package::Package;

/// Fact that unlocks warping to the eye system.
pub const EYE_WARP_FACT: &str = "OPC_EYE_COORDINATES_X1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The same file was registered twice. The first registration is kept.
    #[error("'{path}' from '{package}' is already registered")]
    DuplicateRegistration { package: String, path: String },
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The canonical configuration of one star system.
#[derive(Debug, Clone)]
pub struct SystemRecord {
    pub id: String,
    pub config: StarSystemConfig,
    /// Package credited with the system. `None` for built-ins and placeholders.
    pub package: Option<Arc<Package>>,
    /// Body hosting the spawn point. The last body to declare one wins.
    pub spawn: Option<BodyId>,
    /// Package-relative path of the file that created the record.
    pub relative_path: String,
}

impl SystemRecord {
    fn placeholder(id: &str, config: StarSystemConfig) -> Self {
        Self {
            id: id.to_string(),
            config,
            package: None,
            spawn: None,
            relative_path: String::new(),
        }
    }

    pub fn package_name(&self) -> Option<&str> {
        self.package.as_deref().map(|p| p.unique_name.as_str())
    }
}

/// One loaded body file.
#[derive(Debug)]
pub struct BodyRecord {
    pub config: PlanetConfig,
    pub package: Option<Arc<Package>>,
    pub relative_path: String,
    cache: Option<BodyCache>,
    /// Set while the body's runtime object exists.
    pub runtime: Option<RuntimeHandle>,
}

impl BodyRecord {
    pub fn new(config: PlanetConfig, relative_path: impl Into<String>, package: Option<Arc<Package>>) -> Self {
        Self {
            config,
            package,
            relative_path: relative_path.into(),
            cache: None,
            runtime: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn system_id(&self) -> &str {
        &self.config.star_system
    }

    /// Where this body's cache lives, if it belongs to a package file.
    pub fn cache_path(&self) -> Option<PathBuf> {
        let package = self.package.as_deref()?;
        if self.relative_path.is_empty() {
            return None;
        }
        Some(BodyCache::path_for(&package.root, &self.relative_path))
    }

    /// Open the cache if it is not already open.
    ///
    /// Bodies without a backing file get no cache. On error the cache stays
    /// closed.
    pub fn load_cache(&mut self) -> Result<(), CacheError> {
        if self.cache.is_some() {
            return Ok(());
        }
        if let Some(path) = self.cache_path() {
            self.cache = Some(BodyCache::open(path)?);
        }
        Ok(())
    }

    pub fn cache(&self) -> Option<&BodyCache> {
        self.cache.as_ref()
    }

    pub fn cache_mut(&mut self) -> Option<&mut BodyCache> {
        self.cache.as_mut()
    }

    /// Close the cache, optionally writing the used entries back to disk.
    pub fn unload_cache(&mut self, write_back: bool) -> Result<(), CacheError> {
        let Some(mut cache) = self.cache.take() else {
            return Ok(());
        };
        if write_back {
            cache.clear_unaccessed();
            cache.write()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Registry {
    systems: HashMap<String, SystemRecord>,
    bodies: SlotMap<BodyId, BodyRecord>,
    /// Bodies per system in insertion order.
    system_bodies: HashMap<String, Vec<BodyId>>,
    /// `(package, relative path)` of every registered file.
    registered_paths: HashSet<(String, String)>,
    defaults: DefaultSystemResolver,
    migrator: Migrator,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry seeded with the built-in systems and the standard migrator.
    pub fn new() -> Self {
        Self::with_migrator(Migrator::standard())
    }

    pub fn with_migrator(migrator: Migrator) -> Self {
        let mut registry = Self {
            systems: HashMap::new(),
            bodies: SlotMap::with_key(),
            system_bodies: HashMap::new(),
            registered_paths: HashSet::new(),
            defaults: DefaultSystemResolver::new(),
            migrator,
        };
        registry.seed_builtins();
        registry
    }

    fn seed_builtins(&mut self) {
        for id in [PRIMARY_SYSTEM, EYE_SYSTEM] {
            self.systems
                .insert(id.to_string(), SystemRecord::placeholder(id, builtin_config(id)));
        }
    }

    /// Clear every system and body and re-seed the built-ins.
    ///
    /// The declared default is forgotten; the user override is kept. All
    /// previously issued [`BodyId`]s become invalid.
    pub fn reset(&mut self) {
        self.systems.clear();
        self.bodies.clear();
        self.system_bodies.clear();
        self.registered_paths.clear();
        self.defaults.reset_declared();
        self.seed_builtins();
        debug!("registry reset");
    }

    /// Return the record for `id`, creating a default placeholder if needed.
    pub fn ensure_system(&mut self, id: &str) -> &mut SystemRecord {
        match self.systems.entry(id.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                debug!(system = id, "creating placeholder system");
                e.insert(SystemRecord::placeholder(id, StarSystemConfig::default()))
            }
        }
    }

    /// Register a system file, merging into any existing record.
    pub fn register_system(
        &mut self,
        id: &str,
        mut config: StarSystemConfig,
        relative_path: &str,
        package: Option<Arc<Package>>,
    ) -> Result<(), RegistryError> {
        let package_name = package.as_deref().map(|p| p.unique_name.as_str());
        let ctx = MigrationContext { package: package_name };
        self.migrator.migrate_system(&mut config, &ctx);
        self.claim_path(package_name, relative_path)?;

        if config.starts_here() {
            self.defaults.claim(id);
        }

        match self.systems.entry(id.to_string()) {
            Entry::Vacant(e) => {
                debug!(system = id, path = relative_path, "registering system");
                e.insert(SystemRecord {
                    id: id.to_string(),
                    config,
                    package,
                    spawn: None,
                    relative_path: relative_path.to_string(),
                });
            }
            Entry::Occupied(e) => {
                debug!(system = id, path = relative_path, "merging system");
                let record = e.into_mut();
                let had_identity = record.config.has_identity();
                record.config.merge(config);
                if !had_identity {
                    record.package = package;
                }
            }
        }
        Ok(())
    }

    /// Register a body file under the system it names.
    ///
    /// The system is created as a placeholder if nobody has declared it.
    pub fn register_body(
        &mut self,
        mut config: PlanetConfig,
        relative_path: &str,
        package: Option<Arc<Package>>,
    ) -> Result<BodyId, RegistryError> {
        let package_name = package.as_deref().map(|p| p.unique_name.as_str());
        let ctx = MigrationContext { package: package_name };
        self.migrator.migrate_body(&mut config, &ctx);
        self.claim_path(package_name, relative_path)?;

        let system_id = config.star_system.clone();
        let is_spawn = config.is_spawn_point();
        debug!(body = config.name.as_str(), system = system_id.as_str(), "registering body");

        self.ensure_system(&system_id);
        let body = self
            .bodies
            .insert(BodyRecord::new(config, relative_path, package));
        self.system_bodies
            .entry(system_id.clone())
            .or_default()
            .push(body);

        if is_spawn {
            if let Some(system) = self.systems.get_mut(&system_id) {
                system.spawn = Some(body);
            }
        }
        Ok(body)
    }

    fn claim_path(&mut self, package: Option<&str>, relative_path: &str) -> Result<(), RegistryError> {
        if relative_path.is_empty() {
            return Ok(());
        }
        let package = package.unwrap_or_default().to_string();
        let key = (package, relative_path.to_string());
        if self.registered_paths.contains(&key) {
            warn!(package = key.0.as_str(), path = relative_path, "file registered twice; keeping first");
            return Err(RegistryError::DuplicateRegistration {
                package: key.0,
                path: key.1,
            });
        }
        self.registered_paths.insert(key);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn system(&self, id: &str) -> Option<&SystemRecord> {
        self.systems.get(id)
    }

    pub fn system_mut(&mut self, id: &str) -> Option<&mut SystemRecord> {
        self.systems.get_mut(id)
    }

    pub fn contains_system(&self, id: &str) -> bool {
        self.systems.contains_key(id)
    }

    /// Every system id, sorted.
    pub fn system_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.systems.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Bodies of `system` in registration order.
    pub fn body_ids_of(&self, system: &str) -> &[BodyId] {
        self.system_bodies
            .get(system)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Body names of `system` in registration order.
    pub fn body_names_of(&self, system: &str) -> Vec<&str> {
        self.body_ids_of(system)
            .iter()
            .filter_map(|&id| self.bodies.get(id))
            .map(BodyRecord::name)
            .collect()
    }

    pub fn body(&self, id: BodyId) -> Option<&BodyRecord> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut BodyRecord> {
        self.bodies.get_mut(id)
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn defaults(&self) -> &DefaultSystemResolver {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut DefaultSystemResolver {
        &mut self.defaults
    }

    /// The system to start in: a known override, else the declared default,
    /// else the primary system.
    pub fn effective_default(&self) -> &str {
        self.defaults.effective(|id| self.systems.contains_key(id))
    }

    /// Whether the override names a registered system.
    pub fn override_active(&self) -> bool {
        self.defaults.override_active(|id| self.systems.contains_key(id))
    }

    pub fn migrator(&self) -> &Migrator {
        &self.migrator
    }
}

/// The configuration a built-in system is seeded with.
fn builtin_config(id: &str) -> StarSystemConfig {
    let coords = if id == EYE_SYSTEM {
        NomaiCoordinates::new(&[1, 5, 4], &[3, 0, 1, 4], &[1, 2, 3, 0, 5, 4])
    } else {
        NomaiCoordinates::new(&[0, 3, 2, 1, 5], &[4, 5, 3, 2, 1], &[4, 1, 2, 5, 0])
    };
    StarSystemConfig {
        destroy_stock_planets: Some(false),
        fact_required_for_warp: (id == EYE_SYSTEM).then(|| EYE_WARP_FACT.to_string()),
        vessel: Some(VesselModule {
            coords: Some(coords),
            ..Default::default()
        }),
        ..Default::default()
    }
}
