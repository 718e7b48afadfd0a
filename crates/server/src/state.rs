//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use krishi_voice_config::Settings;
use krishi_voice_gateway::BhashiniGateway;
use krishi_voice_pipeline::VoicePipeline;

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Settings>,
    /// Voice pipeline shared by all handlers
    pub pipeline: Arc<VoicePipeline>,
}

impl AppState {
    /// Create application state backed by the Bhashini speech gateway
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        let gateway = BhashiniGateway::new(config.gateway.clone())
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        let pipeline = VoicePipeline::new(Arc::new(gateway), config.vad.energy_threshold);

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        })
    }
}
