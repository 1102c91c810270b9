//! Feedback gateway — rating validation and forwarding

use super::error::ChatError;
use crate::serving::ServingBackend;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Accepted rating values.
pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

/// Validates feedback eligibility and forwards ratings to the serving
/// endpoint. Makes no backend call when the endpoint lacks feedback
/// capability or the rating is out of range.
pub struct FeedbackGateway {
    backend: Arc<dyn ServingBackend>,
    endpoint: String,
    /// Capability flag resolved once at startup.
    supported: bool,
}

impl FeedbackGateway {
    pub fn new(
        backend: Arc<dyn ServingBackend>,
        endpoint: impl Into<String>,
        supported: bool,
    ) -> Self {
        Self {
            backend,
            endpoint: endpoint.into(),
            supported,
        }
    }

    /// Forward a rating for a previously returned request id. No retry.
    pub async fn submit_rating(&self, request_id: &str, rating: i32) -> Result<(), ChatError> {
        if !self.supported {
            return Err(ChatError::FeedbackUnsupported);
        }
        if !RATING_RANGE.contains(&rating) {
            return Err(ChatError::InvalidRating(rating));
        }

        self.backend
            .submit_feedback(&self.endpoint, request_id, rating)
            .await
            .map_err(ChatError::FeedbackSubmission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serving::mock::MockServingBackend;

    #[tokio::test]
    async fn test_unsupported_endpoint_makes_no_call() {
        let backend = Arc::new(MockServingBackend::new().with_feedback_support(false));
        let gateway = FeedbackGateway::new(backend.clone(), "test-endpoint", false);

        let err = gateway.submit_rating("r1", 3).await.unwrap_err();
        assert!(matches!(err, ChatError::FeedbackUnsupported));
        assert!(backend.submitted_feedback().await.is_empty());
    }

    #[tokio::test]
    async fn test_rating_forwarded_verbatim() {
        let backend = Arc::new(MockServingBackend::new().with_feedback_support(true));
        let gateway = FeedbackGateway::new(backend.clone(), "test-endpoint", true);

        gateway.submit_rating("r1", 5).await.unwrap();

        let submitted = backend.submitted_feedback().await;
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].endpoint, "test-endpoint");
        assert_eq!(submitted[0].request_id, "r1");
        assert_eq!(submitted[0].rating, 5);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_rejected_without_call() {
        let backend = Arc::new(MockServingBackend::new().with_feedback_support(true));
        let gateway = FeedbackGateway::new(backend.clone(), "test-endpoint", true);

        for rating in [0, 6, -1, 42] {
            let err = gateway.submit_rating("r1", rating).await.unwrap_err();
            assert!(matches!(err, ChatError::InvalidRating(r) if r == rating));
        }
        assert!(backend.submitted_feedback().await.is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_wrapped() {
        let backend = Arc::new(
            MockServingBackend::new()
                .with_feedback_support(true)
                .with_failing_feedback(),
        );
        let gateway = FeedbackGateway::new(backend, "test-endpoint", true);

        let err = gateway.submit_rating("r1", 2).await.unwrap_err();
        assert!(matches!(err, ChatError::FeedbackSubmission(_)));
    }
}
