//! Error taxonomy for chat and feedback operations

use thiserror::Error;

/// Failures surfaced by the chat manager and feedback gateway.
///
/// The HTTP layer maps these to status codes in one place
/// (`api::handlers::AppError`); nothing here retries or panics.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The serving call failed (network, timeout, backend error).
    #[error("{0}")]
    Inference(anyhow::Error),

    /// Feedback requested on an endpoint without feedback capability.
    #[error("Feedback not supported by this endpoint")]
    FeedbackUnsupported,

    /// Rating outside the accepted 1..=5 range.
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),

    /// The feedback submission call failed.
    #[error("{0}")]
    FeedbackSubmission(anyhow::Error),
}
