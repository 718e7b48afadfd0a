//! Per-session language configuration registry

use std::collections::HashMap;

use parking_lot::RwLock;

use krishi_voice_core::{Language, LanguageConfig};

/// Owns the session -> language configuration map
///
/// Read-mostly; writers hold the lock for the whole update so readers observe
/// either the old or the new configuration in full, never a mix.
#[derive(Debug, Default)]
pub struct SessionLanguageRegistry {
    configs: RwLock<HashMap<String, LanguageConfig>>,
}

impl SessionLanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite the session's configuration with defaults for the
    /// given source language
    pub fn configure(&self, session_id: &str, language: Language) -> LanguageConfig {
        let config = LanguageConfig::for_source(language);
        self.configs
            .write()
            .insert(session_id.to_string(), config.clone());
        config
    }

    /// Stored configuration for a session; never auto-creates
    pub fn get(&self, session_id: &str) -> Option<LanguageConfig> {
        self.configs.read().get(session_id).cloned()
    }

    /// Replace only the source language, keeping target language, model ids,
    /// voice, and speed intact. A session that was never configured gets a
    /// fresh default configuration for the new language.
    pub fn switch(&self, session_id: &str, new_language: Language) -> LanguageConfig {
        let mut configs = self.configs.write();
        let config = configs
            .entry(session_id.to_string())
            .or_insert_with(|| LanguageConfig::for_source(new_language));
        config.source_language = new_language;
        config.clone()
    }
}
