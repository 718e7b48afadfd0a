//! External speech gateway contract
//!
//! The pipeline does not perform recognition, translation, or synthesis
//! itself; it consumes a provider of these capabilities through the
//! [`SpeechGateway`] trait. Value objects returned by the gateway are
//! immutable snapshots of one call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::language::{AudioFormat, AudioQuality, Language};

/// ASR output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub confidence: f32,
    pub language: Language,
    pub is_final: bool,
    pub latency_ms: f64,
}

/// NMT output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub original_text: String,
    pub translated_text: String,
    pub source_language: Language,
    pub target_language: Language,
    pub confidence: f32,
    pub latency_ms: f64,
}

impl Translation {
    /// Identity pass used when source and target language coincide.
    /// Zero latency, full confidence, no network call involved.
    pub fn identity(text: impl Into<String>, language: Language) -> Self {
        let text = text.into();
        Self {
            original_text: text.clone(),
            translated_text: text,
            source_language: language,
            target_language: language,
            confidence: 1.0,
            latency_ms: 0.0,
        }
    }
}

/// TTS output; `audio_data` is base64-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synthesis {
    pub text: String,
    pub audio_data: String,
    pub audio_format: AudioFormat,
    pub duration_seconds: f64,
    pub latency_ms: f64,
}

/// OCR output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrExtraction {
    pub text: String,
    pub confidence: f32,
    pub language: Language,
    pub latency_ms: f64,
}

/// Asynchronous ASR/NMT/TTS/OCR provider
///
/// Implementations carry their own bounded timeouts and retry transient
/// failures internally; a returned error is terminal for the call.
#[async_trait]
pub trait SpeechGateway: Send + Sync {
    /// Transcribe base64-encoded audio to text in the given language
    async fn transcribe(
        &self,
        audio: &str,
        language: Language,
        format: AudioFormat,
    ) -> Result<Transcription, GatewayError>;

    /// Translate text between languages
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<Translation, GatewayError>;

    /// Synthesize speech for text, returning base64-encoded audio
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
        voice: &str,
        speed: f32,
        quality: AudioQuality,
    ) -> Result<Synthesis, GatewayError>;

    /// Extract text from a base64-encoded image
    async fn extract_text(
        &self,
        image: &str,
        language: Language,
    ) -> Result<OcrExtraction, GatewayError>;
}
