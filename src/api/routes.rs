//! API route definitions

use super::chat_handlers;
use super::dashboard_handlers;
use super::frontend;
use super::handlers::{self, GatewayState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: GatewayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Health check
        .route("/api/health", get(handlers::health))
        // Chat
        .route("/api/chat", post(chat_handlers::chat))
        .route(
            "/api/chat/history",
            get(chat_handlers::get_chat_history).delete(chat_handlers::clear_chat_history),
        )
        // Feedback
        .route("/api/feedback", post(chat_handlers::submit_chat_feedback))
        // Dashboard
        .route(
            "/api/dashboard-data",
            get(dashboard_handlers::get_dashboard_data),
        );

    // Frontend fallback: embedded assets when compiled in, dist/ on disk
    // otherwise (unless running API-only)
    #[cfg(feature = "embedded-frontend")]
    let router = router.fallback(frontend::serve_embedded);
    #[cfg(not(feature = "embedded-frontend"))]
    let router = if state.serve_frontend {
        router.fallback(frontend::serve_spa)
    } else {
        router
    };

    // Middleware
    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
