//! Per-package addon manifests: achievements, credits and popups.

use std::collections::HashMap;

use serde::Deserialize;

use crate::translation::{Language, TextType, TranslationTable};

/// Base name of the addon manifest at a package root.
pub const ADDON_MANIFEST_NAME: &str = "addon-manifest";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AchievementInfo {
    pub id: String,
    pub secret: bool,
    /// Facts that unlock the achievement when all are known.
    pub facts: Vec<String>,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddonManifest {
    pub achievements: Vec<AchievementInfo>,
    /// Credit lines, translated through the UI dictionary.
    pub credits: Vec<String>,
    /// Message shown once when the package is first loaded.
    pub popup_message: Option<String>,
    /// Show the popup on every launch instead of once.
    pub repeat_popup: bool,
}

/// Addon manifests by package unique name.
#[derive(Debug, Clone, Default)]
pub struct AddonRegistry {
    manifests: HashMap<String, AddonManifest>,
}

impl AddonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the manifest for `package`. Returns `false` if one was already
    /// stored, in which case the first is kept.
    pub fn insert(&mut self, package: &str, manifest: AddonManifest) -> bool {
        if self.manifests.contains_key(package) {
            return false;
        }
        self.manifests.insert(package.to_string(), manifest);
        true
    }

    pub fn get(&self, package: &str) -> Option<&AddonManifest> {
        self.manifests.get(package)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.manifests.contains_key(package)
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    /// Translated credit lines for `package`.
    pub fn credits(&self, package: &str, table: &TranslationTable, language: Language) -> Vec<String> {
        self.get(package)
            .map(|m| {
                m.credits
                    .iter()
                    .map(|line| table.translate(line, TextType::Ui, language).to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every achievement across packages, ordered by package name.
    pub fn achievements(&self) -> Vec<(&str, &AchievementInfo)> {
        let mut packages: Vec<(&String, &AddonManifest)> = self.manifests.iter().collect();
        packages.sort_by(|a, b| a.0.cmp(b.0));
        packages
            .into_iter()
            .flat_map(|(p, m)| m.achievements.iter().map(move |a| (p.as_str(), a)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.manifests.clear();
    }
}
