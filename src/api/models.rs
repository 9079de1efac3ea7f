//! Caller-facing response models.
//!
//! Every relay response carries exactly one of `result` or `error`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Successful relay response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"result": "def validate_email(address: str) -> bool: ..."}))]
pub struct ResultResponse {
    /// Text of the first content block returned upstream
    pub result: String,
}

/// Failed relay response, always sent with HTTP 500.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"error": "Server missing API Key. Set ANTHROPIC_API_KEY in .env file."}))]
pub struct ErrorResponse {
    /// Human-readable failure message
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
