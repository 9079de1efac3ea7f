//! API layer for the relay server.
//!
//! This module contains the HTTP handlers, caller-facing models, the upstream
//! wire models, and router assembly.

pub mod claude_models;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod router;

// Re-export commonly used types
pub use claude_models::{ClaudeMessagesRequest, ClaudeMessagesResponse};
pub use handlers::{get_result, health, metrics_handler, AppState};
pub use models::{ErrorResponse, HealthResponse, ResultResponse};
pub use openapi::ApiDoc;
pub use router::{bind_listener, build_router};
