//! In-memory mock implementation of ServingBackend for testing without a
//! real serving endpoint.

use super::traits::{QueryOutcome, RoleMessage, ServingBackend};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// One recorded feedback submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedFeedback {
    pub endpoint: String,
    pub request_id: String,
    pub rating: i32,
}

/// In-memory mock implementation of ServingBackend for testing.
///
/// Responses are scripted with [`enqueue`](Self::enqueue) /
/// [`enqueue_error`](Self::enqueue_error) and consumed in order. When the
/// queue is empty, `query` echoes the last user message so bulk tests don't
/// need to script every turn. All calls are recorded for assertions.
pub struct MockServingBackend {
    scripted: RwLock<VecDeque<Result<QueryOutcome, String>>>,
    submitted: RwLock<Vec<SubmittedFeedback>>,
    query_calls: RwLock<usize>,
    feedback_supported: bool,
    fail_feedback: bool,
}

impl MockServingBackend {
    /// Create a mock that reports no feedback capability.
    pub fn new() -> Self {
        Self {
            scripted: RwLock::new(VecDeque::new()),
            submitted: RwLock::new(Vec::new()),
            query_calls: RwLock::new(0),
            feedback_supported: false,
            fail_feedback: false,
        }
    }

    /// Set whether `supports_feedback` reports true.
    pub fn with_feedback_support(mut self, supported: bool) -> Self {
        self.feedback_supported = supported;
        self
    }

    /// Make `submit_feedback` fail.
    pub fn with_failing_feedback(mut self) -> Self {
        self.fail_feedback = true;
        self
    }

    /// Script the next query response.
    pub async fn enqueue(&self, messages: Vec<RoleMessage>, request_id: Option<&str>) {
        self.scripted.write().await.push_back(Ok(QueryOutcome {
            messages,
            request_id: request_id.map(str::to_string),
        }));
    }

    /// Script the next query to fail with the given message.
    pub async fn enqueue_error(&self, message: &str) {
        self.scripted
            .write()
            .await
            .push_back(Err(message.to_string()));
    }

    /// Number of `query` calls seen so far.
    pub async fn query_calls(&self) -> usize {
        *self.query_calls.read().await
    }

    /// The configured capability flag, without going through the trait.
    pub fn feedback_enabled(&self) -> bool {
        self.feedback_supported
    }

    /// Snapshot of all recorded feedback submissions.
    pub async fn submitted_feedback(&self) -> Vec<SubmittedFeedback> {
        self.submitted.read().await.clone()
    }
}

impl Default for MockServingBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServingBackend for MockServingBackend {
    async fn query(
        &self,
        _endpoint: &str,
        messages: &[RoleMessage],
        _max_tokens: u32,
        _return_trace: bool,
    ) -> Result<QueryOutcome> {
        *self.query_calls.write().await += 1;

        match self.scripted.write().await.pop_front() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(message)) => Err(anyhow!(message)),
            None => {
                // Unscripted: echo the last user message
                let echo = messages
                    .iter()
                    .rev()
                    .find(|m| m.role == "user")
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                Ok(QueryOutcome {
                    messages: vec![RoleMessage::assistant(format!("echo: {}", echo))],
                    request_id: Some(uuid::Uuid::new_v4().to_string()),
                })
            }
        }
    }

    async fn supports_feedback(&self, _endpoint: &str) -> Result<bool> {
        Ok(self.feedback_supported)
    }

    async fn submit_feedback(&self, endpoint: &str, request_id: &str, rating: i32) -> Result<()> {
        if self.fail_feedback {
            return Err(anyhow!("feedback endpoint unavailable"));
        }
        self.submitted.write().await.push(SubmittedFeedback {
            endpoint: endpoint.to_string(),
            request_id: request_id.to_string(),
            rating,
        });
        Ok(())
    }
}
