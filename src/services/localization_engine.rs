use std::collections::HashMap;

use log::warn;

use crate::types::settings::DEFAULT_LANGUAGE;

/// Well-known key under which a translation dictionary is delivered to the
/// selector before it is bootstrapped.
pub const TRANSLATIONS_KEY: &str = "__snipsightTranslations";

/// Supported languages.
const SUPPORTED_LANGUAGES: &[&str] = &["en", "pl"];

const EN_TRANSLATIONS: &str = include_str!("../../locales/en.json");
const PL_TRANSLATIONS: &str = include_str!("../../locales/pl.json");

/// Trait defining the localization engine interface.
pub trait LocalizationEngineTrait {
    fn set_language(&mut self, lang: &str);
    fn language(&self) -> &str;
    fn t(&self, key: &str) -> String;
    fn translations_for(&self, lang: &str) -> &HashMap<String, String>;
    fn stash_injected(&mut self, translations: HashMap<String, String>);
    fn create_translator(&mut self) -> Translator;
    fn available_languages(&self) -> Vec<String>;
}

/// Key → string lookup handed to a selector session. Unknown keys fall back
/// to the key itself so a missing translation never breaks rendering.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    table: HashMap<String, String>,
}

impl Translator {
    pub fn new(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    pub fn translate(&self, key: &str) -> String {
        self.table
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Localization engine managing the embedded English and Polish tables.
pub struct LocalizationEngine {
    current_language: String,
    tables: HashMap<String, HashMap<String, String>>,
    /// Dictionary delivered through the injected-globals contract, consumed
    /// by the next `create_translator` call.
    injected: Option<HashMap<String, String>>,
}

impl LocalizationEngine {
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        tables.insert("en".to_string(), Self::parse_table("en", EN_TRANSLATIONS));
        tables.insert("pl".to_string(), Self::parse_table("pl", PL_TRANSLATIONS));
        Self {
            current_language: DEFAULT_LANGUAGE.to_string(),
            tables,
            injected: None,
        }
    }

    fn parse_table(lang: &str, raw: &str) -> HashMap<String, String> {
        match serde_json::from_str(raw) {
            Ok(table) => table,
            Err(e) => {
                warn!("embedded locale '{}' failed to parse: {}", lang, e);
                HashMap::new()
            }
        }
    }

    /// Resolves a requested language to a supported one, falling back to the
    /// default for anything unknown.
    pub fn resolve_language(lang: &str) -> &'static str {
        SUPPORTED_LANGUAGES
            .iter()
            .find(|supported| **supported == lang)
            .copied()
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Whether a dictionary is currently stashed for consumption.
    pub fn has_injected(&self) -> bool {
        self.injected.is_some()
    }
}

impl Default for LocalizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalizationEngineTrait for LocalizationEngine {
    fn set_language(&mut self, lang: &str) {
        self.current_language = Self::resolve_language(lang).to_string();
    }

    fn language(&self) -> &str {
        &self.current_language
    }

    /// Looks up a key in the active language, falling back to English and
    /// finally to the key itself.
    fn t(&self, key: &str) -> String {
        if let Some(value) = self
            .tables
            .get(&self.current_language)
            .and_then(|table| table.get(key))
        {
            return value.clone();
        }
        self.tables
            .get(DEFAULT_LANGUAGE)
            .and_then(|table| table.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn translations_for(&self, lang: &str) -> &HashMap<String, String> {
        let resolved = Self::resolve_language(lang);
        self.tables
            .get(resolved)
            .or_else(|| self.tables.get(DEFAULT_LANGUAGE))
            .expect("default locale table is always present")
    }

    /// Stashes a dictionary delivered under [`TRANSLATIONS_KEY`]. Replaces
    /// any previously stashed dictionary.
    fn stash_injected(&mut self, translations: HashMap<String, String>) {
        self.injected = Some(translations);
    }

    /// Builds a translator from the stashed dictionary, consuming it so no
    /// state leaks into later invocations. Without a stashed dictionary the
    /// active language's table is used.
    fn create_translator(&mut self) -> Translator {
        match self.injected.take() {
            Some(table) => Translator::new(table),
            None => {
                let language = self.current_language.clone();
                Translator::new(self.translations_for(&language).clone())
            }
        }
    }

    fn available_languages(&self) -> Vec<String> {
        SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect()
    }
}
