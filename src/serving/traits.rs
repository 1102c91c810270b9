//! Trait abstraction for model-serving operations

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single role-tagged message exchanged with the serving endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl RoleMessage {
    /// Build a user message from raw input text.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Result of one serving-endpoint query: the returned message list plus the
/// request id the endpoint assigned (used later to correlate feedback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub messages: Vec<RoleMessage>,
    pub request_id: Option<String>,
}

/// Trait abstracting the externally hosted model-serving service.
///
/// Covers the three operations the gateway needs: chat completion,
/// feedback-capability lookup, and feedback submission. Implemented by
/// `ServingClient` (HTTP) and `MockServingBackend` (in-memory, tests).
#[async_trait]
pub trait ServingBackend: Send + Sync {
    /// Send a message list to the endpoint and return its reply messages.
    ///
    /// `return_trace` asks the endpoint to attach trace metadata, which is
    /// what makes the returned request id usable for feedback correlation.
    async fn query(
        &self,
        endpoint: &str,
        messages: &[RoleMessage],
        max_tokens: u32,
        return_trace: bool,
    ) -> Result<QueryOutcome>;

    /// Whether the endpoint accepts feedback submissions.
    async fn supports_feedback(&self, endpoint: &str) -> Result<bool>;

    /// Forward a rating for a previously returned request id.
    async fn submit_feedback(&self, endpoint: &str, request_id: &str, rating: i32) -> Result<()>;
}
