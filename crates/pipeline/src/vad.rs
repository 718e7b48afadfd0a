//! Energy-based voice activity detection
//!
//! A simple heuristic over raw PCM energy, not a learned classifier. The
//! threshold is runtime configuration so deployments can tune it for noisy
//! fields versus quiet indoor use without a rebuild.

/// Result of one detection call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VadResult {
    pub is_speech: bool,
    pub confidence: f32,
}

/// Classifies raw audio chunks as speech or silence
///
/// Pure and deterministic: identical input always yields identical output.
/// Never fails; malformed audio counts as silence.
#[derive(Debug, Clone)]
pub struct VoiceActivityDetector {
    energy_threshold: f64,
}

impl VoiceActivityDetector {
    /// Default energy threshold for speech detection
    pub const DEFAULT_ENERGY_THRESHOLD: f64 = 0.02;

    pub fn new(energy_threshold: f64) -> Self {
        Self { energy_threshold }
    }

    /// Detect whether a chunk of little-endian 16-bit PCM contains speech
    pub fn detect(&self, audio: &[u8]) -> VadResult {
        let energy = self.energy(audio);
        let is_speech = energy > self.energy_threshold;
        let confidence = if is_speech {
            (energy / self.energy_threshold).min(1.0) as f32
        } else {
            0.0
        };

        VadResult {
            is_speech,
            confidence,
        }
    }

    /// Mean of squared sample values; odd-length or empty input is silence
    fn energy(&self, audio: &[u8]) -> f64 {
        if audio.is_empty() || audio.len() % 2 != 0 {
            return 0.0;
        }

        let sum: f64 = audio
            .chunks_exact(2)
            .map(|chunk| {
                let sample = i16::from_le_bytes([chunk[0], chunk[1]]) as f64;
                sample * sample
            })
            .sum();

        sum / (audio.len() / 2) as f64
    }
}

impl Default for VoiceActivityDetector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ENERGY_THRESHOLD)
    }
}
