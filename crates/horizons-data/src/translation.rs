//! Per-language translation tables.
//!
//! Packages ship at most one translation file per supported language. Each
//! file is merged additively into the global table; a key defined by two
//! packages takes the later package's text.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    SpanishLa,
    German,
    French,
    Italian,
    Polish,
    PortugueseBr,
    Japanese,
    Russian,
    ChineseSimple,
    Korean,
    Turkish,
}

impl Language {
    pub const ALL: [Language; 12] = [
        Language::English,
        Language::SpanishLa,
        Language::German,
        Language::French,
        Language::Italian,
        Language::Polish,
        Language::PortugueseBr,
        Language::Japanese,
        Language::Russian,
        Language::ChineseSimple,
        Language::Korean,
        Language::Turkish,
    ];

    /// Base name of this language's file in a `translations/` folder.
    pub fn file_name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::SpanishLa => "spanish_la",
            Language::German => "german",
            Language::French => "french",
            Language::Italian => "italian",
            Language::Polish => "polish",
            Language::PortugueseBr => "portuguese_br",
            Language::Japanese => "japanese",
            Language::Russian => "russian",
            Language::ChineseSimple => "chinese_simple",
            Language::Korean => "korean",
            Language::Turkish => "turkish",
        }
    }
}

/// Which dictionary a key is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextType {
    Dialogue,
    ShipLog,
    Ui,
    Achievement,
}

/// Contents of one translation file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub dialogue_dictionary: HashMap<String, String>,
    pub ship_log_dictionary: HashMap<String, String>,
    pub ui_dictionary: HashMap<String, String>,
    pub achievement_dictionary: HashMap<String, String>,
}

impl TranslationConfig {
    fn into_entries(self) -> [(TextType, HashMap<String, String>); 4] {
        [
            (TextType::Dialogue, self.dialogue_dictionary),
            (TextType::ShipLog, self.ship_log_dictionary),
            (TextType::Ui, self.ui_dictionary),
            (TextType::Achievement, self.achievement_dictionary),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: HashMap<(Language, TextType), HashMap<String, String>>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's dictionaries into the table.
    pub fn add(&mut self, language: Language, config: TranslationConfig) {
        for (text_type, dictionary) in config.into_entries() {
            if dictionary.is_empty() {
                continue;
            }
            self.entries
                .entry((language, text_type))
                .or_default()
                .extend(dictionary);
        }
    }

    /// Look up `key`, falling back to English and then to the key itself.
    pub fn translate<'a>(&'a self, key: &'a str, text_type: TextType, language: Language) -> &'a str {
        self.lookup(key, text_type, language)
            .or_else(|| self.lookup(key, text_type, Language::English))
            .unwrap_or(key)
    }

    fn lookup(&self, key: &str, text_type: TextType, language: Language) -> Option<&str> {
        self.entries
            .get(&(language, text_type))
            .and_then(|d| d.get(key))
            .map(String::as_str)
    }

    pub fn has_language(&self, language: Language) -> bool {
        self.entries.keys().any(|(l, _)| *l == language)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
