//! Multilingual voice interaction pipeline
//!
//! Takes a farmer's voice query from raw audio to a spoken answer:
//! voice activity detection, speech recognition, translation to English,
//! intent recognition and entity extraction, ambiguity detection with a
//! single-use clarification protocol, deterministic response templates,
//! translation back, and speech synthesis. Network speech services sit
//! behind the [`krishi_voice_core::SpeechGateway`] trait so the whole
//! pipeline runs against a mock in tests.

pub mod disambiguation;
pub mod fallback;
pub mod intent;
pub mod language;
pub mod orchestrator;
pub mod response;
pub mod vad;

pub use disambiguation::{DisambiguationHandler, PendingDisambiguation, Resolution};
pub use fallback::{FallbackHandler, FallbackMode};
pub use intent::{IntentRecognizer, IntentResult};
pub use language::SessionLanguageRegistry;
pub use orchestrator::VoicePipeline;
pub use vad::{VadResult, VoiceActivityDetector};

use krishi_voice_core::GatewayError;
use thiserror::Error;

/// Errors raised inside a voice turn before fallback handling takes over
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request audio was not valid base64
    #[error("audio decode failed: {0}")]
    InvalidAudio(String),

    /// The recognizer returned an empty transcript for detected speech
    #[error("ASR failed")]
    AsrEmpty,

    /// A speech service call failed after retries
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
