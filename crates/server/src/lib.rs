//! HTTP server for the farmer voice assistant
//!
//! Exposes the voice pipeline over a small REST surface: one endpoint per
//! voice turn plus session language management and disambiguation
//! resolution.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown confirmation id: {0}")]
    UnknownConfirmation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::UnknownConfirmation(_) => axum::http::StatusCode::NOT_FOUND,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
