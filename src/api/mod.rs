//! HTTP API for the gateway

pub mod chat_handlers;
pub mod dashboard_handlers;
pub mod frontend;
pub mod handlers;
pub mod routes;

pub use routes::create_router;
