//! Per-body on-disk cache.
//!
//! Each body may keep a small string store next to its config file, used by
//! builders to memoize expensive derived data across sessions. The file is
//! a `bitcode` blob with a versioned header. Keys that are never read during
//! a session are dropped when the cache is written back.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension of cache files, replacing the config file's extension.
pub const CACHE_EXTENSION: &str = "nhcache";

/// Magic number identifying a body cache file.
pub const CACHE_MAGIC: u32 = 0x4E48_4301;

/// Current cache format version.
pub const CACHE_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache {path}: decode failed: {detail}")]
    Decode { path: PathBuf, detail: String },

    #[error("cache {path}: invalid magic 0x{found:08X}")]
    InvalidMagic { path: PathBuf, found: u32 },

    #[error("cache {path}: unsupported version {found} (expected {CACHE_VERSION})")]
    UnsupportedVersion { path: PathBuf, found: u32 },

    #[error("cache {path}: encode failed: {detail}")]
    Encode { path: PathBuf, detail: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    magic: u32,
    version: u32,
    entries: BTreeMap<String, String>,
}

/// An open body cache. Owned by exactly one body record.
#[derive(Debug)]
pub struct BodyCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    accessed: HashSet<String>,
}

impl BodyCache {
    /// Cache location for a body config at `relative_path` under `root`.
    pub fn path_for(root: &Path, relative_path: &str) -> PathBuf {
        root.join(relative_path).with_extension(CACHE_EXTENSION)
    }

    /// Create an empty cache that will be written to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
            accessed: HashSet::new(),
        }
    }

    /// Open the cache at `path`. A missing file yields an empty cache.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::empty(path)),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let file: CacheFile = bitcode::deserialize(&bytes).map_err(|e| CacheError::Decode {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        if file.magic != CACHE_MAGIC {
            return Err(CacheError::InvalidMagic {
                path,
                found: file.magic,
            });
        }
        if file.version != CACHE_VERSION {
            return Err(CacheError::UnsupportedVersion {
                path,
                found: file.version,
            });
        }

        Ok(Self {
            path,
            entries: file.entries,
            accessed: HashSet::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up `key`, marking it as used this session.
    pub fn get(&mut self, key: &str) -> Option<&str> {
        let value = self.entries.get(key)?;
        if !self.accessed.contains(key) {
            self.accessed.insert(key.to_string());
        }
        Some(value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `value` under `key`. New entries count as used.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.accessed.insert(key.clone());
        self.entries.insert(key, value.into());
    }

    /// Drop every entry that was not read or written this session.
    pub fn clear_unaccessed(&mut self) {
        let accessed = &self.accessed;
        self.entries.retain(|k, _| accessed.contains(k));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache to its path, creating parent directories.
    pub fn write(&self) -> Result<(), CacheError> {
        let file = CacheFile {
            magic: CACHE_MAGIC,
            version: CACHE_VERSION,
            entries: self.entries.clone(),
        };
        let bytes = bitcode::serialize(&file).map_err(|e| CacheError::Encode {
            path: self.path.clone(),
            detail: e.to_string(),
        })?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, bytes).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
