//! Chat API handlers — message turn, history, feedback

use crate::api::handlers::{AppError, GatewayState};
use crate::chat::ChatExchange;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

/// Truncate a message for log output.
fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

// ============================================================================
// Chat turn
// ============================================================================

/// Incoming chat message. `timestamp` is accepted for frontend convenience
/// but not used; the server assigns the authoritative one.
#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Outgoing chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub timestamp: String,
    pub request_id: Option<String>,
}

impl From<ChatExchange> for ChatResponse {
    fn from(exchange: ChatExchange) -> Self {
        Self {
            message: exchange.assistant_message,
            timestamp: exchange.timestamp,
            request_id: exchange.request_id,
        }
    }
}

/// POST /api/chat — run one inference round and record the exchange
pub async fn chat(
    State(state): State<GatewayState>,
    Json(request): Json<ChatMessage>,
) -> Result<Json<ChatResponse>, AppError> {
    tracing::info!("Received chat message: {}...", preview(&request.message));

    let exchange = state.chat.handle_message(&request.message).await?;

    tracing::info!(
        "Generated response: {}...",
        preview(&exchange.assistant_message)
    );
    Ok(Json(exchange.into()))
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ChatExchange>,
}

/// GET /api/chat/history — all retained exchanges, oldest first
pub async fn get_chat_history(State(state): State<GatewayState>) -> Json<HistoryResponse> {
    tracing::info!("Chat history requested");
    Json(HistoryResponse {
        history: state.history.list().await,
    })
}

/// DELETE /api/chat/history — clear the buffer
pub async fn clear_chat_history(
    State(state): State<GatewayState>,
) -> Json<serde_json::Value> {
    state.history.clear().await;
    tracing::info!("Chat history cleared");
    Json(serde_json::json!({ "message": "Chat history cleared" }))
}

// ============================================================================
// Feedback
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    pub request_id: String,
    pub rating: i32,
}

/// POST /api/feedback?request_id=..&rating=.. — forward a rating
pub async fn submit_chat_feedback(
    State(state): State<GatewayState>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .feedback
        .submit_rating(&query.request_id, query.rating)
        .await?;

    tracing::info!(
        "Feedback submitted for request {}: {}",
        query.request_id,
        query.rating
    );
    Ok(Json(
        serde_json::json!({ "message": "Feedback submitted successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use crate::serving::mock::MockServingBackend;
    use crate::serving::RoleMessage;
    use crate::test_helpers::test_router;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use chrono::DateTime;
    use tower::ServiceExt; // oneshot

    fn post_json(uri: &str, body: serde_json::Value) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_roundtrip_then_history() {
        let backend = MockServingBackend::new();
        backend
            .enqueue(vec![RoleMessage::assistant("hi there")], Some("r1"))
            .await;
        let app = test_router(backend);

        let resp = app
            .clone()
            .oneshot(post_json("/api/chat", serde_json::json!({"message": "hello"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["message"], "hi there");
        assert_eq!(json["request_id"], "r1");
        // Timestamp must parse as RFC 3339
        DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).unwrap();

        let resp = app.oneshot(get("/api/chat/history")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["user_message"], "hello");
        assert_eq!(history[0]["assistant_message"], "hi there");
        assert_eq!(history[0]["request_id"], "r1");
    }

    #[tokio::test]
    async fn test_clear_history_roundtrip() {
        let backend = MockServingBackend::new();
        backend
            .enqueue(vec![RoleMessage::assistant("hi there")], Some("r1"))
            .await;
        let app = test_router(backend);

        app.clone()
            .oneshot(post_json("/api/chat", serde_json::json!({"message": "hello"})))
            .await
            .unwrap();

        let resp = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method("DELETE")
                    .uri("/api/chat/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], "Chat history cleared");

        let resp = app.oneshot(get("/api/chat/history")).await.unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["history"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_chat_inference_failure_returns_500_detail() {
        let backend = MockServingBackend::new();
        backend.enqueue_error("endpoint timed out").await;
        let app = test_router(backend);

        let resp = app
            .clone()
            .oneshot(post_json("/api/chat", serde_json::json!({"message": "hello"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(resp).await;
        let detail = json["detail"].as_str().unwrap();
        assert!(
            detail.starts_with("Error processing message:"),
            "unexpected detail: {}",
            detail
        );
        assert!(detail.contains("endpoint timed out"));

        // Failed turns leave no trace in history
        let resp = app.oneshot(get("/api/chat/history")).await.unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["history"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_feedback_unsupported_returns_400() {
        let app = test_router(MockServingBackend::new().with_feedback_support(false));

        let resp = app
            .oneshot(post_json(
                "/api/feedback?request_id=r1&rating=3",
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await["detail"],
            "Feedback not supported by this endpoint"
        );
    }

    #[tokio::test]
    async fn test_feedback_success() {
        let app = test_router(MockServingBackend::new().with_feedback_support(true));

        let resp = app
            .oneshot(post_json(
                "/api/feedback?request_id=r1&rating=4",
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await["message"],
            "Feedback submitted successfully"
        );
    }

    #[tokio::test]
    async fn test_feedback_out_of_range_rating_returns_400() {
        let app = test_router(MockServingBackend::new().with_feedback_support(true));

        let resp = app
            .oneshot(post_json(
                "/api/feedback?request_id=r1&rating=11",
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_feedback_submission_failure_returns_500_detail() {
        let app = test_router(
            MockServingBackend::new()
                .with_feedback_support(true)
                .with_failing_feedback(),
        );

        let resp = app
            .oneshot(post_json(
                "/api/feedback?request_id=r1&rating=2",
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let detail = body_json(resp).await["detail"].as_str().unwrap().to_string();
        assert!(
            detail.starts_with("Error submitting feedback:"),
            "unexpected detail: {}",
            detail
        );
    }

    #[tokio::test]
    async fn test_health_reports_endpoint_and_capability() {
        let app = test_router(MockServingBackend::new().with_feedback_support(true));

        let resp = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["serving_endpoint"], "test-endpoint");
        assert_eq!(json["endpoint_supports_feedback"], true);
        DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).unwrap();
    }
}
