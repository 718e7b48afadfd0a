//! HTTP Endpoints
//!
//! REST API for the voice pipeline.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use krishi_voice_core::{Language, LanguageConfig, VoiceAnswer, VoiceQuery};
use krishi_voice_pipeline::Resolution;

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Voice turn
        .route("/api/v1/voice/process", post(process_voice))
        // Session language management
        .route("/api/v1/voice/language/configure", post(configure_language))
        .route("/api/v1/voice/language/switch", post(switch_language))
        // Clarification resolution
        .route(
            "/api/v1/voice/disambiguation/resolve",
            post(resolve_disambiguation),
        )
        // Health check
        .route("/health", get(health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Process one voice turn; failures surface inside the answer, never as an
/// error status
async fn process_voice(
    State(state): State<AppState>,
    Json(query): Json<VoiceQuery>,
) -> Json<VoiceAnswer> {
    Json(state.pipeline.process(query).await)
}

#[derive(Debug, Deserialize)]
struct ConfigureLanguageRequest {
    session_id: String,
    language: Language,
}

/// Create or reset a session's language configuration
async fn configure_language(
    State(state): State<AppState>,
    Json(request): Json<ConfigureLanguageRequest>,
) -> Json<LanguageConfig> {
    let config = state
        .pipeline
        .configure_language(&request.session_id, request.language);
    Json(config)
}

#[derive(Debug, Deserialize)]
struct SwitchLanguageRequest {
    session_id: String,
    new_language: Language,
}

/// Switch a session's source language, preserving its other settings
async fn switch_language(
    State(state): State<AppState>,
    Json(request): Json<SwitchLanguageRequest>,
) -> Json<LanguageConfig> {
    let config = state
        .pipeline
        .switch_language(&request.session_id, request.new_language);
    Json(config)
}

#[derive(Debug, Deserialize)]
struct ResolveRequest {
    confirmation_id: String,
    selected_option: String,
}

#[derive(Debug, Serialize)]
struct ResolveResponse {
    confirmation_id: String,
    #[serde(flatten)]
    resolution: Resolution,
}

/// Resolve a pending clarification; unknown or already used ids are 404
async fn resolve_disambiguation(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, StatusCode> {
    let resolution = state
        .pipeline
        .resolve_disambiguation(&request.confirmation_id, &request.selected_option)
        .ok_or_else(|| {
            StatusCode::from(ServerError::UnknownConfirmation(
                request.confirmation_id.clone(),
            ))
        })?;

    Ok(Json(ResolveResponse {
        confirmation_id: request.confirmation_id,
        resolution,
    }))
}

/// Health check
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
