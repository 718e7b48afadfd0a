//! Error types shared across the workspace

use thiserror::Error;

/// Errors surfaced at the external speech gateway boundary
///
/// Transient failures (rate limits, timeouts, 5xx) are retried inside the
/// gateway; only the terminal outcome crosses this boundary. The orchestrator
/// uses the variant to pick between fallback and immediate error.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Non-recoverable API response; retrying would not help
    #[error("gateway returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Transient failures persisted past the retry ceiling
    #[error("gateway request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// Response body did not match the expected shape
    #[error("unexpected gateway response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure before any response was received
    #[error("gateway transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    /// True for failures that no amount of retrying will fix
    pub fn is_permanent(&self) -> bool {
        matches!(self, GatewayError::Api { .. } | GatewayError::InvalidResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_classification() {
        let api = GatewayError::Api {
            status: 400,
            message: "bad request".to_string(),
        };
        assert!(api.is_permanent());

        let exhausted = GatewayError::RetriesExhausted {
            attempts: 3,
            last_error: "timeout".to_string(),
        };
        assert!(!exhausted.is_permanent());
    }

    #[test]
    fn display_mentions_attempts() {
        let err = GatewayError::RetriesExhausted {
            attempts: 3,
            last_error: "429".to_string(),
        };
        assert!(err.to_string().contains("3 attempts"));
    }
}
