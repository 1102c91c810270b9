//! Chat orchestration — one inference round per user message

use super::error::ChatError;
use super::history::{ChatExchange, HistoryStore};
use crate::serving::{RoleMessage, ServingBackend};
use chrono::Utc;
use std::sync::Arc;

/// Token budget for every inference request.
pub const MAX_RESPONSE_TOKENS: u32 = 400;

/// Reply stored when the endpoint returns no usable assistant message.
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response. Please try again.";

/// Orchestrates a chat turn: builds the request, extracts the reply, and
/// records the completed exchange in history.
pub struct ChatManager {
    backend: Arc<dyn ServingBackend>,
    history: Arc<HistoryStore>,
    endpoint: String,
    /// Resolved once at startup; also doubles as the trace-request flag.
    supports_feedback: bool,
}

impl ChatManager {
    pub fn new(
        backend: Arc<dyn ServingBackend>,
        history: Arc<HistoryStore>,
        endpoint: impl Into<String>,
        supports_feedback: bool,
    ) -> Self {
        Self {
            backend,
            history,
            endpoint: endpoint.into(),
            supports_feedback,
        }
    }

    /// Run one chat turn for `user_text` (empty input is accepted and
    /// forwarded as-is).
    ///
    /// On success the exchange has been appended to history, evicting the
    /// oldest entry past capacity. On failure nothing is stored and the
    /// error surfaces to the HTTP boundary; there is no retry here.
    pub async fn handle_message(&self, user_text: &str) -> Result<ChatExchange, ChatError> {
        let request = vec![RoleMessage::user(user_text)];

        let outcome = self
            .backend
            .query(
                &self.endpoint,
                &request,
                MAX_RESPONSE_TOKENS,
                self.supports_feedback,
            )
            .await
            .map_err(ChatError::Inference)?;

        // First assistant entry with non-empty content wins
        let assistant_message = outcome
            .messages
            .iter()
            .find(|m| m.role == "assistant" && !m.content.is_empty())
            .map(|m| m.content.clone())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        let exchange = ChatExchange {
            user_message: user_text.to_string(),
            assistant_message,
            timestamp: Utc::now().to_rfc3339(),
            request_id: outcome.request_id,
        };

        self.history.append(exchange.clone()).await;
        Ok(exchange)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
