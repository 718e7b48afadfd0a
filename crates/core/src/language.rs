//! Language and audio types for the Bhashini-backed pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// Indian languages supported by the speech gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "pa")]
    Punjabi,
    #[serde(rename = "or")]
    Odia,
    #[serde(rename = "as")]
    Assamese,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// ISO 639-1 code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::Bengali => "bn",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Marathi => "mr",
            Language::Gujarati => "gu",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Punjabi => "pa",
            Language::Odia => "or",
            Language::Assamese => "as",
            Language::English => "en",
        }
    }

    /// All supported languages
    pub fn all() -> &'static [Language] {
        &[
            Language::Hindi,
            Language::Bengali,
            Language::Tamil,
            Language::Telugu,
            Language::Marathi,
            Language::Gujarati,
            Language::Kannada,
            Language::Malayalam,
            Language::Punjabi,
            Language::Odia,
            Language::Assamese,
            Language::English,
        ]
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Hindi
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Supported audio container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Webm,
    Flac,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Webm => "webm",
            AudioFormat::Flac => "flac",
        }
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat::Wav
    }
}

/// Audio quality levels for low-bandwidth optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioQuality {
    High,
    Medium,
    Low,
}

impl Default for AudioQuality {
    fn default() -> Self {
        AudioQuality::Medium
    }
}

/// Per-session language configuration for the speech gateway
///
/// Owned exclusively by the session language registry; mutated only through
/// configure/switch operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Farmer's spoken language
    pub source_language: Language,

    /// Pipeline-internal language (always English)
    #[serde(default = "default_target_language")]
    pub target_language: Language,

    /// ASR model identifier
    #[serde(default = "default_asr_model")]
    pub asr_model: String,

    /// NMT model identifier
    #[serde(default = "default_nmt_model")]
    pub nmt_model: String,

    /// TTS voice
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,

    /// TTS speed multiplier (0.5 - 2.0)
    #[serde(default = "default_tts_speed")]
    pub tts_speed: f32,
}

impl LanguageConfig {
    /// Default configuration for a given source language
    pub fn for_source(source_language: Language) -> Self {
        Self {
            source_language,
            target_language: default_target_language(),
            asr_model: default_asr_model(),
            nmt_model: default_nmt_model(),
            tts_voice: default_tts_voice(),
            tts_speed: default_tts_speed(),
        }
    }
}

fn default_target_language() -> Language {
    Language::English
}

fn default_asr_model() -> String {
    "default".to_string()
}

fn default_nmt_model() -> String {
    "agriculture".to_string()
}

fn default_tts_voice() -> String {
    "female".to_string()
}

fn default_tts_speed() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip() {
        for lang in Language::all() {
            let json = serde_json::to_string(lang).unwrap();
            assert_eq!(json, format!("\"{}\"", lang.code()));
            let back: Language = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *lang);
        }
    }

    #[test]
    fn twelve_supported_languages() {
        assert_eq!(Language::all().len(), 12);
    }

    #[test]
    fn config_defaults() {
        let config = LanguageConfig::for_source(Language::Hindi);
        assert_eq!(config.source_language, Language::Hindi);
        assert_eq!(config.target_language, Language::English);
        assert_eq!(config.asr_model, "default");
        assert_eq!(config.nmt_model, "agriculture");
        assert_eq!(config.tts_voice, "female");
        assert_eq!(config.tts_speed, 1.0);
    }
}
