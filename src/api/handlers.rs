//! HTTP request handlers for the relay API.
//!
//! This module contains the relay endpoint plus health and metrics.

use crate::api::claude_models::ClaudeMessagesRequest;
use crate::api::models::*;
use crate::core::config::AppConfig;
use crate::core::logging::get_request_id;
use crate::core::metrics::{get_metrics, OUTCOME_SUCCESS};
use crate::core::{AppError, Result};
use crate::services::ClaudeClient;
use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

/// Shared application state.
///
/// Built once at startup and never mutated; concurrent requests only read it.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub claude_client: ClaudeClient,
}

impl AppState {
    pub fn new(config: AppConfig, claude_client: ClaudeClient) -> Self {
        Self {
            config,
            claude_client,
        }
    }

    /// Build state with a client derived from `config`.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let claude_client = ClaudeClient::new(&config)?;
        Ok(Self::new(config, claude_client))
    }
}

/// Relay the fixed prompt upstream and return the generated text.
///
/// Without a configured API key this fails immediately and the upstream is
/// never contacted. Every failure is reported as HTTP 500.
#[utoipa::path(
    get,
    path = "/api/result",
    tag = "relay",
    responses(
        (status = 200, description = "Text generated for the fixed prompt", body = ResultResponse),
        (status = 500, description = "Missing API key, upstream error, or transport failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(request_id = %get_request_id()))]
pub async fn get_result(State(state): State<Arc<AppState>>) -> Result<Json<ResultResponse>> {
    let outcome = relay(&state).await;

    let label = match &outcome {
        Ok(_) => OUTCOME_SUCCESS,
        Err(e) => {
            tracing::warn!(error_kind = %e.kind(), error = %e, "Relay request failed");
            e.kind().as_str()
        }
    };
    get_metrics().relay_outcomes.with_label_values(&[label]).inc();

    outcome.map(|result| Json(ResultResponse { result }))
}

async fn relay(state: &AppState) -> Result<String> {
    let api_key = state
        .config
        .anthropic
        .api_key
        .as_deref()
        .ok_or(AppError::MissingApiKey)?;

    let request = ClaudeMessagesRequest::fixed();
    state.claude_client.create_message(api_key, &request).await
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Server is running", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Prometheus text exposition of all registered metrics.
pub async fn metrics_handler() -> Result<Response> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to encode metrics");
            AppError::Internal(e.to_string())
        })?;

    Ok(([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], buffer).into_response())
}
