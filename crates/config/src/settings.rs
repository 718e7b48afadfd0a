//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// External speech gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Voice activity detection configuration
    #[serde(default)]
    pub vad: VadSettings,
}

impl Settings {
    /// Load settings from `krishi-voice.toml` (optional) layered with
    /// `KRISHI_VOICE__`-prefixed environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = File::with_name(path.unwrap_or("krishi-voice")).required(false);

        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("KRISHI_VOICE").separator("__"))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vad.energy_threshold <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "vad.energy_threshold".to_string(),
                message: "energy threshold must be positive".to_string(),
            });
        }

        if self.gateway.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gateway.timeout_secs".to_string(),
                message: "timeout must be at least 1 second".to_string(),
            });
        }

        if self.gateway.retry.max_delay_ms < self.gateway.retry.base_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "gateway.retry.max_delay_ms".to_string(),
                message: "max delay must be at least the base delay".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// External speech gateway (Bhashini) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// ASR service base URL
    #[serde(default = "default_asr_url")]
    pub asr_url: String,

    /// NMT service base URL
    #[serde(default = "default_nmt_url")]
    pub nmt_url: String,

    /// TTS service base URL
    #[serde(default = "default_tts_url")]
    pub tts_url: String,

    /// OCR service base URL
    #[serde(default = "default_ocr_url")]
    pub ocr_url: String,

    /// Bearer token; requests go unauthenticated when absent
    #[serde(default)]
    pub api_key: Option<String>,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Retry policy for transient failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            asr_url: default_asr_url(),
            nmt_url: default_nmt_url(),
            tts_url: default_tts_url(),
            ocr_url: default_ocr_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

fn default_asr_url() -> String {
    "https://asr.bhashini.gov.in".to_string()
}

fn default_nmt_url() -> String {
    "https://nmt.bhashini.gov.in".to_string()
}

fn default_tts_url() -> String {
    "https://tts.bhashini.gov.in".to_string()
}

fn default_ocr_url() -> String {
    "https://ocr.bhashini.gov.in".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Retry policy configuration for gateway calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retry attempts after the initial request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubles each attempt)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Delay cap in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

/// Voice activity detection configuration
///
/// The threshold stays runtime configuration so noisy field deployments can
/// be tuned without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VadSettings {
    /// Energy threshold above which a chunk counts as speech
    #[serde(default = "default_energy_threshold")]
    pub energy_threshold: f64,
}

impl Default for VadSettings {
    fn default() -> Self {
        Self {
            energy_threshold: default_energy_threshold(),
        }
    }
}

fn default_energy_threshold() -> f64 {
    0.02
}
