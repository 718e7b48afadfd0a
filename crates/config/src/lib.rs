//! Configuration for the farmer voice assistant
//!
//! Settings load from an optional TOML file layered with
//! `KRISHI_VOICE__`-prefixed environment variables.

mod settings;

pub use settings::{
    GatewayConfig, RetryConfig, ServerConfig, Settings, VadSettings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse configuration sources
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A loaded value is out of range or inconsistent
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
