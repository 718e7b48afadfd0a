//! Bhashini speech gateway client
//!
//! HTTP implementation of the [`SpeechGateway`] contract over the Bhashini
//! ASR, NMT, TTS, and OCR services. Every call carries bounded timeouts and
//! retries transient failures with exponential backoff before surfacing a
//! typed [`GatewayError`].

mod bhashini;
pub mod retry;

pub use bhashini::BhashiniGateway;
pub use retry::RetryPolicy;

pub use krishi_voice_core::{GatewayError, SpeechGateway};
