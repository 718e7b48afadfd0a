//! Voice processing orchestrator
//!
//! Drives one voice turn through VAD, ASR, translation, intent recognition,
//! disambiguation, response generation, translation back, and TTS. Each turn
//! is a linear pass with early exits: no speech and disambiguation both end
//! the turn, and any upstream failure degrades to the text fallback. The
//! caller always receives a structured answer.

use std::sync::Arc;
use std::time::Instant;

use base64::Engine;
use uuid::Uuid;

use krishi_voice_core::{
    GatewayError, Language, LanguageConfig, SpeechGateway, Translation, VoiceAnswer, VoiceQuery,
};

use crate::disambiguation::{DisambiguationHandler, Resolution};
use crate::fallback::{FallbackHandler, FallbackMode};
use crate::intent::IntentRecognizer;
use crate::language::SessionLanguageRegistry;
use crate::response;
use crate::vad::VoiceActivityDetector;
use crate::PipelineError;

const NO_SPEECH_MESSAGE: &str = "Could not detect speech. Please speak clearly.";
const NO_SPEECH_REASON: &str = "No speech detected";
const FALLBACK_DISABLED_MESSAGE: &str =
    "Voice processing failed. Please try again or use text input.";
const TEXT_FALLBACK_MESSAGE: &str =
    "Voice recognition failed. Please repeat your query or type it instead.";

/// A stage failure carrying the best transcript known at that point.
/// The transcript keys the fallback cache lookup.
struct StageFailure {
    error: PipelineError,
    transcript: Option<String>,
}

/// Orchestrates the full voice interaction pipeline
///
/// One instance is created at process start and shared by handle across all
/// request handlers; the session and disambiguation maps it owns are
/// internally synchronized.
pub struct VoicePipeline {
    gateway: Arc<dyn SpeechGateway>,
    vad: VoiceActivityDetector,
    recognizer: IntentRecognizer,
    disambiguation: DisambiguationHandler,
    fallback: FallbackHandler,
    languages: SessionLanguageRegistry,
}

impl VoicePipeline {
    pub fn new(gateway: Arc<dyn SpeechGateway>, vad_energy_threshold: f64) -> Self {
        Self {
            gateway,
            vad: VoiceActivityDetector::new(vad_energy_threshold),
            recognizer: IntentRecognizer::new(),
            disambiguation: DisambiguationHandler::new(),
            fallback: FallbackHandler::new(),
            languages: SessionLanguageRegistry::new(),
        }
    }

    /// Create or overwrite the language configuration for a session
    pub fn configure_language(&self, session_id: &str, language: Language) -> LanguageConfig {
        self.languages.configure(session_id, language)
    }

    /// Switch a session's source language mid-conversation, preserving all
    /// other settings. Pending disambiguations are keyed by confirmation id,
    /// not session id, so none are invalidated.
    pub fn switch_language(&self, session_id: &str, new_language: Language) -> LanguageConfig {
        let config = self.languages.switch(session_id, new_language);
        tracing::info!(session = %session_id, language = %new_language, "language switched");
        config
    }

    /// Stored language configuration for a session, if any
    pub fn language_config(&self, session_id: &str) -> Option<LanguageConfig> {
        self.languages.get(session_id)
    }

    /// Resolve a pending disambiguation; `None` for unknown or already
    /// resolved ids
    pub fn resolve_disambiguation(
        &self,
        confirmation_id: &str,
        selected_option: &str,
    ) -> Option<Resolution> {
        self.disambiguation.resolve(confirmation_id, selected_option)
    }

    /// Seed the fallback cache with a known good answer
    pub fn cache_response(&self, query: &str, response: &str) {
        self.fallback.cache_response(query, response);
    }

    /// Process one voice turn
    pub async fn process(&self, query: VoiceQuery) -> VoiceAnswer {
        let started = Instant::now();
        let session_id = query
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        // Auto-configure first-contact sessions from the request language
        let config = match self.languages.get(&session_id) {
            Some(config) => config,
            None => self.languages.configure(&session_id, query.source_language),
        };

        match self.run(&session_id, &query, &config, started).await {
            Ok(answer) => answer,
            Err(failure) => {
                tracing::error!(
                    session = %session_id,
                    error = %failure.error,
                    "voice pipeline failed, degrading"
                );
                self.fallback_to_text(&session_id, &query, failure, started)
            }
        }
    }

    async fn run(
        &self,
        session_id: &str,
        query: &VoiceQuery,
        config: &LanguageConfig,
        started: Instant,
    ) -> Result<VoiceAnswer, StageFailure> {
        // Voice activity detection
        let audio = base64::engine::general_purpose::STANDARD
            .decode(&query.audio_data)
            .map_err(|e| StageFailure {
                error: PipelineError::InvalidAudio(e.to_string()),
                transcript: None,
            })?;

        let vad_result = self.vad.detect(&audio);
        if !vad_result.is_speech {
            // A silent request is a complete turn, not a fallback
            tracing::debug!(session = %session_id, "no speech detected");
            let mut answer = VoiceAnswer::text_only(session_id, NO_SPEECH_MESSAGE);
            answer.fallback_reason = Some(NO_SPEECH_REASON.to_string());
            answer.latency_ms = elapsed_ms(started);
            return Ok(answer);
        }

        // Speech to text in the session's source language
        let transcription = self
            .gateway
            .transcribe(&query.audio_data, config.source_language, query.audio_format)
            .await
            .map_err(|e| StageFailure {
                error: e.into(),
                transcript: None,
            })?;

        if transcription.text.is_empty() {
            return Err(StageFailure {
                error: PipelineError::AsrEmpty,
                transcript: None,
            });
        }
        let user_text = transcription.text;

        // Translate to English for intent processing
        let translation = self
            .translate(&user_text, config.source_language, config.target_language)
            .await
            .map_err(|e| StageFailure {
                error: e.into(),
                transcript: Some(user_text.clone()),
            })?;
        let user_text_english = translation.translated_text;

        // Intent recognition and entity extraction
        let intent = self.recognizer.recognize_intent(&user_text_english);
        let entities = self.recognizer.extract_entities(&user_text_english);

        // Disambiguation check: a clarification request ends the turn
        let (ambiguous, options) = self
            .recognizer
            .is_ambiguous(&user_text_english, intent.confidence);
        if ambiguous && !options.is_empty() {
            let confirmation_id = self.disambiguation.create(
                &user_text_english,
                options.clone(),
                config.source_language,
            );
            let message =
                self.disambiguation
                    .message(&user_text_english, &options, config.source_language);

            let mut answer = VoiceAnswer::text_only(session_id, message);
            answer.user_text = user_text;
            answer.user_text_english = user_text_english;
            answer.intent = Some(intent.label);
            answer.entities = entities;
            answer.confidence = intent.confidence;
            answer.disambiguation_required = true;
            answer.disambiguation_options = options;
            answer.confirmation_id = Some(confirmation_id);
            answer.latency_ms = elapsed_ms(started);
            return Ok(answer);
        }

        // Deterministic response from the template table
        let response_english = response::generate_response(&intent.label, &entities);

        // Translate back to the farmer's language (identity when English)
        let response_text = self
            .translate(&response_english, Language::English, config.source_language)
            .await
            .map_err(|e| StageFailure {
                error: e.into(),
                transcript: Some(user_text.clone()),
            })?
            .translated_text;

        // Speech synthesis with the session's voice settings
        let synthesis = self
            .gateway
            .synthesize(
                &response_text,
                config.source_language,
                &config.tts_voice,
                config.tts_speed,
                query.audio_quality,
            )
            .await
            .map_err(|e| StageFailure {
                error: e.into(),
                transcript: Some(user_text.clone()),
            })?;

        let response_audio = if synthesis.audio_data.is_empty() {
            None
        } else {
            Some(synthesis.audio_data)
        };

        let mut answer = VoiceAnswer::text_only(session_id, response_text);
        answer.user_text = user_text;
        answer.user_text_english = user_text_english;
        answer.response_audio = response_audio;
        answer.intent = Some(intent.label);
        answer.entities = entities;
        answer.confidence = intent.confidence;
        answer.latency_ms = elapsed_ms(started);
        Ok(answer)
    }

    /// Identity shortcut applied at every translation call site: equal
    /// language pairs never reach the gateway.
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<Translation, GatewayError> {
        if source == target {
            return Ok(Translation::identity(text, source));
        }
        self.gateway.translate(text, source, target).await
    }

    /// Degrade a failed voice turn along the chain: voice has failed, so try
    /// the cache and fall through to a text prompt. The cache is keyed by the
    /// last transcript the pipeline produced, which may be empty when ASR
    /// itself failed.
    fn fallback_to_text(
        &self,
        session_id: &str,
        query: &VoiceQuery,
        failure: StageFailure,
        started: Instant,
    ) -> VoiceAnswer {
        let reason = failure.error.to_string();
        let transcript = failure.transcript.unwrap_or_default();

        let mut answer = VoiceAnswer::text_only(session_id, "");
        answer.user_text = transcript.clone();
        answer.fallback_used = true;
        answer.latency_ms = elapsed_ms(started);

        if !query.enable_fallback {
            answer.response_text = FALLBACK_DISABLED_MESSAGE.to_string();
            answer.fallback_reason = Some(reason);
            return answer;
        }

        if let Some(cached) = self.fallback.get_cached_response(&transcript) {
            tracing::info!(
                session = %session_id,
                mode = ?FallbackMode::Cached,
                "serving cached response"
            );
            answer.response_text = cached;
        } else {
            tracing::info!(session = %session_id, mode = ?FallbackMode::Text, "degrading to text");
            answer.response_text = TEXT_FALLBACK_MESSAGE.to_string();
        }
        answer.fallback_reason = Some(format!("Voice failed: {reason}"));
        answer
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
