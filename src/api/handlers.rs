//! API request handlers — shared state, health check, error boundary

use crate::chat::{ChatError, ChatManager, FeedbackGateway, HistoryStore};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub chat: Arc<ChatManager>,
    pub feedback: Arc<FeedbackGateway>,
    pub history: Arc<HistoryStore>,
    /// Endpoint identity, resolved once at startup
    pub serving_endpoint: String,
    /// Capability flag, resolved once at startup
    pub endpoint_supports_feedback: bool,
    /// Whether to serve the frontend static files (SPA fallback)
    pub serve_frontend: bool,
    /// Path to the frontend dist/ directory
    pub frontend_path: String,
}

/// Shared gateway state
pub type GatewayState = Arc<ServerState>;

// ============================================================================
// Health check
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub serving_endpoint: String,
    pub endpoint_supports_feedback: bool,
}

/// GET /api/health — always 200; reports the configured endpoint and its
/// feedback capability.
pub async fn health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    tracing::info!("Health check at /api/health");
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        serving_endpoint: state.serving_endpoint.clone(),
        endpoint_supports_feedback: state.endpoint_supports_feedback,
    })
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "detail": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

/// Single mapping point from the domain taxonomy to HTTP responses.
impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Inference(e) => {
                AppError::Internal(anyhow::anyhow!("Error processing message: {}", e))
            }
            ChatError::FeedbackUnsupported => AppError::BadRequest(err.to_string()),
            ChatError::InvalidRating(_) => AppError::BadRequest(err.to_string()),
            ChatError::FeedbackSubmission(e) => {
                AppError::Internal(anyhow::anyhow!("Error submitting feedback: {}", e))
            }
        }
    }
}
