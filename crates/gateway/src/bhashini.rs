//! Bhashini API client for ASR, NMT, TTS, and OCR

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use krishi_voice_config::GatewayConfig;
use krishi_voice_core::{
    AudioFormat, AudioQuality, GatewayError, Language, OcrExtraction, SpeechGateway, Synthesis,
    Transcription, Translation,
};

use crate::retry::{self, RetryPolicy};

/// Unified client for the Bhashini speech services
pub struct BhashiniGateway {
    http: reqwest::Client,
    config: GatewayConfig,
    retry: RetryPolicy,
}

impl BhashiniGateway {
    /// Build a client with bounded timeouts from the gateway configuration
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let retry = RetryPolicy::from(&config.retry);

        Ok(Self {
            http,
            config,
            retry,
        })
    }

    /// POST a JSON payload with retry on transient failures.
    ///
    /// Rate limits (429), server errors (5xx), and connect/timeout failures
    /// are retried with backoff up to the configured ceiling; anything else
    /// surfaces immediately as a permanent error.
    async fn post_json(
        &self,
        base_url: &str,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let url = format!("{base_url}{endpoint}");
        let attempts = self.retry.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(retry::delay_for_attempt(&self.retry, attempt - 1)).await;
            }

            let mut request = self.http.post(&url).json(payload);
            if let Some(key) = &self.config.api_key {
                request = request.bearer_auth(key);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if response.status().is_success() {
                        return response
                            .json()
                            .await
                            .map_err(|e| GatewayError::InvalidResponse(e.to_string()));
                    }

                    let body = response.text().await.unwrap_or_default();
                    if retry::is_recoverable(status) {
                        tracing::warn!(
                            url = %url,
                            status,
                            attempt = attempt + 1,
                            "transient gateway error, retrying"
                        );
                        last_error = format!("status {status}");
                        continue;
                    }

                    return Err(GatewayError::Api {
                        status,
                        message: body,
                    });
                }
                Err(err) if err.is_timeout() || err.is_connect() => {
                    tracing::warn!(
                        url = %url,
                        attempt = attempt + 1,
                        error = %err,
                        "gateway request failed, retrying"
                    );
                    last_error = err.to_string();
                }
                Err(err) => return Err(GatewayError::Transport(err.to_string())),
            }
        }

        Err(GatewayError::RetriesExhausted {
            attempts,
            last_error,
        })
    }

    /// Translate several texts in one request, preserving input order
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Result<Vec<Translation>, GatewayError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if source == target {
            return Ok(texts
                .iter()
                .map(|t| Translation::identity(t.as_str(), source))
                .collect());
        }

        let started = Instant::now();

        let inputs: Vec<serde_json::Value> =
            texts.iter().map(|t| json!({ "source": t })).collect();
        let payload = json!({
            "input": inputs,
            "config": {
                "sourceLanguage": source.code(),
                "targetLanguage": target.code(),
                "domain": "agriculture",
            },
        });

        let response = self
            .post_json(&self.config.nmt_url, "/nmt/v1/translate", &payload)
            .await?;
        let envelope: NmtEnvelope = serde_json::from_value(response)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if envelope.output.translations.len() != texts.len() {
            return Err(GatewayError::InvalidResponse(format!(
                "expected {} translations, got {}",
                texts.len(),
                envelope.output.translations.len()
            )));
        }

        let latency_ms = elapsed_ms(started);
        let confidence = envelope.output.confidence;
        Ok(texts
            .iter()
            .zip(envelope.output.translations)
            .map(|(original, translated)| Translation {
                original_text: original.clone(),
                translated_text: translated.target,
                source_language: source,
                target_language: target,
                confidence,
                latency_ms,
            })
            .collect())
    }

    /// Extract text from several images sequentially; fails on the first
    /// failing image
    pub async fn extract_text_batch(
        &self,
        images: &[String],
        language: Language,
    ) -> Result<Vec<OcrExtraction>, GatewayError> {
        let mut extractions = Vec::with_capacity(images.len());
        for image in images {
            extractions.push(self.extract_text(image, language).await?);
        }
        Ok(extractions)
    }
}

#[derive(Debug, Default, Deserialize)]
struct AsrResult {
    #[serde(default)]
    transcription: String,
    #[serde(default)]
    confidence: f32,
}

#[derive(Debug, Default, Deserialize)]
struct AsrEnvelope {
    #[serde(default)]
    result: AsrResult,
}

#[derive(Debug, Default, Deserialize)]
struct NmtTranslation {
    #[serde(default)]
    target: String,
}

#[derive(Debug, Default, Deserialize)]
struct NmtOutput {
    #[serde(default)]
    translations: Vec<NmtTranslation>,
    #[serde(default = "default_nmt_confidence")]
    confidence: f32,
}

fn default_nmt_confidence() -> f32 {
    0.9
}

#[derive(Debug, Default, Deserialize)]
struct NmtEnvelope {
    #[serde(default)]
    output: NmtOutput,
}

#[derive(Debug, Default, Deserialize)]
struct TtsAudio {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct TtsOutput {
    #[serde(default)]
    audio: TtsAudio,
}

#[derive(Debug, Default, Deserialize)]
struct TtsEnvelope {
    #[serde(default)]
    output: TtsOutput,
}

#[derive(Debug, Default, Deserialize)]
struct OcrResult {
    #[serde(default)]
    text: String,
    #[serde(default)]
    confidence: f32,
}

#[derive(Debug, Default, Deserialize)]
struct OcrEnvelope {
    #[serde(default)]
    result: OcrResult,
}

/// Sample rate and bitrate for a quality level
fn quality_params(quality: AudioQuality) -> (u32, u32) {
    match quality {
        AudioQuality::High => (44_100, 320_000),
        AudioQuality::Medium => (22_050, 128_000),
        AudioQuality::Low => (16_000, 64_000),
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[async_trait]
impl SpeechGateway for BhashiniGateway {
    async fn transcribe(
        &self,
        audio: &str,
        language: Language,
        format: AudioFormat,
    ) -> Result<Transcription, GatewayError> {
        let started = Instant::now();

        let audio_bytes = base64::engine::general_purpose::STANDARD
            .decode(audio)
            .map(|b| b.len())
            .unwrap_or(0);

        let payload = json!({
            "audio": {
                "content": audio,
                "format": format.as_str(),
                "encoding": "base64",
            },
            "language": {
                "sourceLanguage": language.code(),
            },
            "config": {
                "enableStreaming": false,
                // Approximate duration for 16kHz 16-bit mono
                "audioDuration": audio_bytes as f64 / 32_000.0,
            },
        });

        let response = self
            .post_json(&self.config.asr_url, "/asr/v1/transcribe", &payload)
            .await?;
        let envelope: AsrEnvelope = serde_json::from_value(response)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(Transcription {
            text: envelope.result.transcription,
            confidence: envelope.result.confidence,
            language,
            is_final: true,
            latency_ms: elapsed_ms(started),
        })
    }

    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<Translation, GatewayError> {
        // Identity shortcut: same language pair never touches the network
        if source == target {
            return Ok(Translation::identity(text, source));
        }

        let started = Instant::now();

        let payload = json!({
            "input": [{ "source": text }],
            "config": {
                "sourceLanguage": source.code(),
                "targetLanguage": target.code(),
                "domain": "agriculture",
            },
        });

        let response = self
            .post_json(&self.config.nmt_url, "/nmt/v1/translate", &payload)
            .await?;
        let envelope: NmtEnvelope = serde_json::from_value(response)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let translated = envelope
            .output
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::InvalidResponse("no translations in response".to_string()))?;

        Ok(Translation {
            original_text: text.to_string(),
            translated_text: translated.target,
            source_language: source,
            target_language: target,
            confidence: envelope.output.confidence,
            latency_ms: elapsed_ms(started),
        })
    }

    async fn synthesize(
        &self,
        text: &str,
        language: Language,
        voice: &str,
        speed: f32,
        quality: AudioQuality,
    ) -> Result<Synthesis, GatewayError> {
        let started = Instant::now();
        let (sample_rate, bitrate) = quality_params(quality);

        let payload = json!({
            "input": [{ "source": text }],
            "config": {
                "language": {
                    "sourceLanguage": language.code(),
                },
                "audio": {
                    "voice": voice,
                    "speed": speed,
                    "samplingRate": sample_rate,
                    "bitrate": bitrate,
                    "format": "mp3",
                },
            },
        });

        let response = self
            .post_json(&self.config.tts_url, "/tts/v1/synthesize", &payload)
            .await?;
        let envelope: TtsEnvelope = serde_json::from_value(response)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let audio_data = envelope.output.audio.content;
        let audio_bytes = base64::engine::general_purpose::STANDARD
            .decode(&audio_data)
            .map(|b| b.len())
            .unwrap_or(0);
        let duration_seconds = audio_bytes as f64 / (sample_rate as f64 * 4.0);

        Ok(Synthesis {
            text: text.to_string(),
            audio_data,
            audio_format: AudioFormat::Mp3,
            duration_seconds,
            latency_ms: elapsed_ms(started),
        })
    }

    async fn extract_text(
        &self,
        image: &str,
        language: Language,
    ) -> Result<OcrExtraction, GatewayError> {
        let started = Instant::now();

        let payload = json!({
            "image": {
                "content": image,
                "encoding": "base64",
            },
            "language": {
                "sourceLanguage": language.code(),
            },
            "config": {
                "detectOrientation": true,
                "textDetection": true,
                "wordLevelConfidence": true,
            },
        });

        let response = self
            .post_json(&self.config.ocr_url, "/ocr/v1/extract", &payload)
            .await?;
        let envelope: OcrEnvelope = serde_json::from_value(response)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(OcrExtraction {
            text: envelope.result.text,
            confidence: envelope.result.confidence,
            language,
            latency_ms: elapsed_ms(started),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_maps_to_sample_rates() {
        assert_eq!(quality_params(AudioQuality::High), (44_100, 320_000));
        assert_eq!(quality_params(AudioQuality::Medium), (22_050, 128_000));
        assert_eq!(quality_params(AudioQuality::Low), (16_000, 64_000));
    }

    #[tokio::test]
    async fn identity_translation_skips_network() {
        // Unroutable URLs: any network attempt would fail, so a successful
        // result proves the shortcut never issued a request.
        let mut config = GatewayConfig::default();
        config.nmt_url = "http://127.0.0.1:1".to_string();
        let gateway = BhashiniGateway::new(config).unwrap();

        let result = gateway
            .translate("wheat price", Language::English, Language::English)
            .await
            .unwrap();
        assert_eq!(result.translated_text, "wheat price");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.latency_ms, 0.0);
    }

    #[tokio::test]
    async fn identity_batch_preserves_order_without_network() {
        let mut config = GatewayConfig::default();
        config.nmt_url = "http://127.0.0.1:1".to_string();
        let gateway = BhashiniGateway::new(config).unwrap();

        let texts = vec!["wheat price".to_string(), "weather today".to_string()];
        let results = gateway
            .translate_batch(&texts, Language::Hindi, Language::Hindi)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].translated_text, "wheat price");
        assert_eq!(results[1].translated_text, "weather today");
    }

    #[test]
    fn parses_asr_envelope() {
        let value = serde_json::json!({
            "result": { "transcription": "wheat price", "confidence": 0.92 }
        });
        let envelope: AsrEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(envelope.result.transcription, "wheat price");
        assert!((envelope.result.confidence - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn nmt_confidence_defaults_when_absent() {
        let value = serde_json::json!({
            "output": { "translations": [{ "target": "hello" }] }
        });
        let envelope: NmtEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(envelope.output.confidence, 0.9);
    }
}
