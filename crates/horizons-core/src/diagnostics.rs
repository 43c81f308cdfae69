//! The list of configs that failed to load, for display to the user.

use std::fmt;

/// Category of a recorded failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Parse,
    Validation,
    DuplicateRegistration,
    Io,
    Build,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Parse => "parse",
            FailureKind::Validation => "validation",
            FailureKind::DuplicateRegistration => "duplicate",
            FailureKind::Io => "io",
            FailureKind::Build => "build",
        };
        f.write_str(s)
    }
}

/// One failed config file or entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedConfig {
    /// Package-relative path of the file, or the body name for build failures.
    pub file: String,
    pub package: Option<String>,
    pub kind: FailureKind,
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    failed: Vec<FailedConfig>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, failure: FailedConfig) {
        self.failed.push(failure);
    }

    pub fn failed_configs(&self) -> &[FailedConfig] {
        &self.failed
    }

    /// File names of every failure, in the order they were recorded.
    pub fn failed_file_names(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.file.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.failed.clear();
    }

    pub fn len(&self) -> usize {
        self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failed.is_empty()
    }
}
