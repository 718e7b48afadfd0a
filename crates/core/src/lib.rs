//! Core types for the farmer voice assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Language and audio types
//! - The external speech gateway contract (ASR, NMT, TTS, OCR)
//! - Voice query/answer models
//! - Error types

pub mod entities;
pub mod error;
pub mod language;
pub mod query;
pub mod speech;

pub use entities::{EntitySet, Quantity};
pub use error::GatewayError;
pub use language::{AudioFormat, AudioQuality, Language, LanguageConfig};
pub use query::{VoiceAnswer, VoiceQuery};
pub use speech::{OcrExtraction, SpeechGateway, Synthesis, Transcription, Translation};
