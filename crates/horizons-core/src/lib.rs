//! Horizons Core -- the configuration registry for data-driven star systems.
//!
//! Content packages describe star systems and the bodies placed in them as
//! data files. This crate owns everything that happens to those
//! descriptions after they are parsed and before anything is built:
//!
//! 1. **Migration** -- deprecated fields are rewritten into their current
//!    shape by a fixed table of upgrade steps ([`migration::Migrator`]).
//! 2. **Registration** -- systems and bodies are stored in an explicitly
//!    owned [`registry::Registry`]. Bodies that reference a system nobody
//!    has declared yet get a default placeholder system.
//! 3. **Merging** -- a system contributed by several packages is collapsed
//!    into one canonical configuration with field-level overlay
//!    ([`merge::Merge`]).
//! 4. **Default selection** -- [`defaults::DefaultSystemResolver`] decides
//!    which system the process starts in.
//!
//! # Key Types
//!
//! - [`registry::Registry`] -- system id -> [`registry::SystemRecord`] and
//!   system id -> ordered [`registry::BodyRecord`]s.
//! - [`config::StarSystemConfig`] / [`config::PlanetConfig`] -- the
//!   system-level and body-level configuration schema.
//! - [`cache::BodyCache`] -- lazily opened on-disk cache owned by one body.
//! - [`settings::Settings`] -- user-facing settings (log verbosity, default
//!   system override).
//! - [`diagnostics::Diagnostics`] -- the list of configs that failed to load.

pub mod cache;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod id;
pub mod merge;
pub mod migration;
pub mod package;
pub mod registry;
pub mod settings;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use id::{BodyId, EYE_SYSTEM, PRIMARY_SYSTEM, RuntimeHandle};
pub use registry::{BodyRecord, Registry, RegistryError, SystemRecord};
