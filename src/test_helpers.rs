//! Test helper factories and mock state builders
//!
//! Provides convenience functions for building a gateway router backed by an
//! in-memory mock serving backend.
#![allow(dead_code)]

use crate::api::handlers::ServerState;
use crate::api::{self, handlers::GatewayState};
use crate::chat::{ChatManager, FeedbackGateway, HistoryStore};
use crate::serving::mock::MockServingBackend;
use axum::Router;
use std::sync::Arc;

const TEST_ENDPOINT: &str = "test-endpoint";

/// Build a GatewayState around the given mock backend. The feedback flag is
/// taken from the mock, mirroring the startup capability resolution.
pub fn mock_state(backend: MockServingBackend) -> GatewayState {
    mock_state_with_frontend(backend, false, "./static")
}

/// Like [`mock_state`], with frontend serving configured.
pub fn mock_state_with_frontend(
    backend: MockServingBackend,
    serve_frontend: bool,
    frontend_path: &str,
) -> GatewayState {
    let supports_feedback = backend.feedback_enabled();
    let backend: Arc<MockServingBackend> = Arc::new(backend);
    let history = Arc::new(HistoryStore::new());

    Arc::new(ServerState {
        chat: Arc::new(ChatManager::new(
            backend.clone(),
            history.clone(),
            TEST_ENDPOINT,
            supports_feedback,
        )),
        feedback: Arc::new(FeedbackGateway::new(
            backend,
            TEST_ENDPOINT,
            supports_feedback,
        )),
        history,
        serving_endpoint: TEST_ENDPOINT.to_string(),
        endpoint_supports_feedback: supports_feedback,
        serve_frontend,
        frontend_path: frontend_path.to_string(),
    })
}

/// Full API router over a mock backend, ready for `oneshot` requests.
pub fn test_router(backend: MockServingBackend) -> Router {
    api::create_router(mock_state(backend))
}
