//! LLM Relay - a single-endpoint relay to the Claude Messages API
//!
//! `GET /api/result` sends one fixed prompt upstream and returns the text of
//! the reply as `{"result": ...}`, or `{"error": ...}` with HTTP 500 when the
//! API key is missing, the upstream reports an error, or the call fails.
//!
//! # Architecture
//!
//! - [`core`]: Core functionality (config, errors, logging, metrics, middleware)
//! - [`api`]: HTTP handlers, request/response models, router
//! - [`services`]: The upstream client
//!
//! # Configuration
//!
//! - `ANTHROPIC_API_KEY`: upstream credential (checked per request)
//! - `ANTHROPIC_API_BASE`: upstream base URL (default: https://api.anthropic.com)
//! - `HOST`: Server bind address (default: 0.0.0.0)
//! - `PORT`: Server port (default: 3000)
//! - `VERIFY_SSL`: Verify SSL certificates for upstream (default: true)
//! - `REQUEST_TIMEOUT_SECS`: Upstream request timeout in seconds (default: 120)
//! - `STATIC_DIR`: Directory served for unmatched paths (default: public)

pub mod api;
pub mod core;
pub mod services;

// Re-export commonly used types for convenience
pub use crate::api::{bind_listener, build_router, AppState, ErrorResponse, ResultResponse};
pub use crate::core::{AppConfig, AppError, ErrorKind, Result};
pub use crate::services::ClaudeClient;
