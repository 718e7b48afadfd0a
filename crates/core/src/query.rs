//! Voice pipeline request/response models

use serde::{Deserialize, Serialize};

use crate::entities::EntitySet;
use crate::language::{AudioFormat, AudioQuality, Language};

/// A single voice query from a farmer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceQuery {
    /// Base64-encoded audio payload, owned by the caller
    pub audio_data: String,

    #[serde(default)]
    pub audio_format: AudioFormat,

    /// Quality level for the synthesized answer
    #[serde(default)]
    pub audio_quality: AudioQuality,

    /// Farmer's spoken language
    #[serde(default)]
    pub source_language: Language,

    /// Response language (usually same as source)
    #[serde(default)]
    pub target_language: Language,

    /// Session to attach to; a fresh one is generated when absent
    #[serde(default)]
    pub session_id: Option<String>,

    /// Whether voice failures may degrade to the text fallback
    #[serde(default = "default_enable_fallback")]
    pub enable_fallback: bool,
}

fn default_enable_fallback() -> bool {
    true
}

/// Structured answer for one voice turn
///
/// The caller always receives one of these; pipeline failures surface as
/// fallback or no-speech answers, never as raw errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceAnswer {
    pub session_id: String,

    /// Transcript in the farmer's language
    pub user_text: String,

    /// Transcript translated to English
    pub user_text_english: String,

    /// Answer text in the farmer's language
    pub response_text: String,

    /// Base64-encoded synthesized answer, when TTS produced audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_audio: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(default, skip_serializing_if = "EntitySet::is_empty")]
    pub entities: EntitySet,

    pub confidence: f32,

    #[serde(default)]
    pub disambiguation_required: bool,

    /// Options offered when disambiguation is required
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disambiguation_options: Vec<String>,

    /// Token for resolving a pending disambiguation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_id: Option<String>,

    #[serde(default)]
    pub fallback_used: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,

    pub latency_ms: f64,
}

impl VoiceAnswer {
    /// Text-only answer skeleton with all optional fields absent
    pub fn text_only(session_id: impl Into<String>, response_text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_text: String::new(),
            user_text_english: String::new(),
            response_text: response_text.into(),
            response_audio: None,
            intent: None,
            entities: EntitySet::default(),
            confidence: 0.0,
            disambiguation_required: false,
            disambiguation_options: Vec::new(),
            confirmation_id: None,
            fallback_used: false,
            fallback_reason: None,
            latency_ms: 0.0,
        }
    }
}
