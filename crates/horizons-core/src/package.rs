//! Content package identity.

use std::path::{Path, PathBuf};

/// An independently distributed content contribution.
///
/// Records keep an `Arc<Package>` as their owning-package reference, so the
/// package value itself is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Globally unique identifier, e.g. `"Author.MySystem"`.
    pub unique_name: String,
    /// Human-readable name used in diagnostics and credits.
    pub name: String,
    /// Directory the package's files live under.
    pub root: PathBuf,
}

impl Package {
    pub fn new(unique_name: impl Into<String>, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            unique_name: unique_name.into(),
            name: name.into(),
            root: root.into(),
        }
    }

    /// Resolve a package-relative path against the package root.
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        self.root.join(relative_path)
    }

    /// Express `path` relative to the package root with `/` separators.
    ///
    /// Paths outside the root are returned unchanged.
    pub fn relative_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
