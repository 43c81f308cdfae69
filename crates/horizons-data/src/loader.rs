//! Format detection, file discovery and deserialization for content files.
//!
//! Content can be written as RON, JSON or TOML; the format is chosen by file
//! extension. These helpers are the only place that touches the file system
//! on the loading path.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use horizons_core::registry::RegistryError;
use horizons_core::validation::ValidationError;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading content files.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// Not a `.json`, `.ron` or `.toml` file.
    #[error("{file} is not a content file")]
    UnsupportedFormat { file: PathBuf },

    /// The same config exists in two formats.
    #[error("{a} and {b} describe the same config")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("malformed config {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The parsed config failed a structural check.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The registry refused the config.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Extensions recognized as content files, in lookup order.
pub const EXTENSIONS: [&str; 3] = ["json", "ron", "toml"];

/// The format implied by `path`'s extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

fn is_content_file(path: &Path) -> bool {
    path.is_file() && detect_format(path).is_ok()
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Find `<base_name>.{json,ron,toml}` in `dir`.
///
/// More than one match is a [`DataLoadError::ConflictingFormats`].
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut matches = EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{base_name}.{ext}")))
        .filter(|path| path.is_file());
    let Some(first) = matches.next() else {
        return Ok(None);
    };
    if let Some(second) = matches.next() {
        return Err(DataLoadError::ConflictingFormats { a: first, b: second });
    }
    Ok(Some(first))
}

/// Every content file under `dir`, recursively, sorted by path.
///
/// A missing directory contributes nothing.
pub fn collect_data_files(dir: &Path) -> Result<Vec<PathBuf>, DataLoadError> {
    let mut files = Vec::new();
    if dir.is_dir() {
        collect_into(dir, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn collect_into(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), DataLoadError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_into(&path, files)?;
        } else if is_content_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read and parse one content file.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format).map_err(|detail| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    })
}

/// Deserialize `content` in the given format.
pub fn deserialize_str<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, String> {
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

/// The file's stem, used as a system id for system files.
pub fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

// ===========================================================================
// Tests
// ===========================================================================
