//! Chat module — orchestration, bounded history, and feedback forwarding

pub mod error;
pub mod feedback;
pub mod history;
pub mod manager;

pub use error::ChatError;
pub use feedback::FeedbackGateway;
pub use history::{ChatExchange, HistoryStore, HISTORY_CAPACITY};
pub use manager::{ChatManager, FALLBACK_REPLY, MAX_RESPONSE_TOKENS};
