//! Horizons Data -- loads content packages from disk into a registry.
//!
//! Content files may be written in RON, JSON or TOML. [`ContentLoader`]
//! walks a package's folders in a fixed order (systems, bodies, addon
//! manifest, translations) and isolates failures per file. User settings
//! are read through the same format detection ([`load_settings`]).

pub mod addon;
pub mod loader;
pub mod orchestrator;
pub mod package;
pub mod settings;
pub mod translation;

pub use loader::{DataLoadError, Format};
pub use orchestrator::{ContentLoader, PackageReport};
pub use package::{discover_packages, load_package_info};
pub use settings::load_settings;
