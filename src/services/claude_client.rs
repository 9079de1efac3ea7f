//! Client for the upstream Claude Messages API.

use crate::api::claude_models::{constants, ClaudeMessagesRequest, ClaudeMessagesResponse};
use crate::core::config::AppConfig;
use crate::core::logging::get_request_id;
use crate::core::metrics::get_metrics;
use crate::core::{AppError, Result};
use anyhow::Context;
use std::error::Error;
use std::time::{Duration, Instant};

/// Performs the single outbound call of a relay request.
///
/// Holds a pooled `reqwest::Client` built once at startup; cloning is cheap
/// and clones share the pool.
#[derive(Clone)]
pub struct ClaudeClient {
    http_client: reqwest::Client,
    messages_url: String,
}

impl ClaudeClient {
    /// Build the client from configuration (timeout, SSL verification, base URL).
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .pool_max_idle_per_host(20)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_http_client(
            http_client,
            config.anthropic.messages_url(),
        ))
    }

    pub fn with_http_client(http_client: reqwest::Client, messages_url: impl Into<String>) -> Self {
        Self {
            http_client,
            messages_url: messages_url.into(),
        }
    }

    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }

    /// Send `request` and return the text of the first content block.
    ///
    /// The reply body is parsed as JSON whatever the HTTP status, so a
    /// structured upstream error surfaces as [`AppError::Upstream`] and an
    /// unreadable body as [`AppError::Transport`]. No retries.
    pub async fn create_message(
        &self,
        api_key: &str,
        request: &ClaudeMessagesRequest,
    ) -> Result<String> {
        let request_id = get_request_id();
        let start = Instant::now();

        let outcome = self.send(api_key, request).await;

        get_metrics()
            .upstream_latency
            .observe(start.elapsed().as_secs_f64());

        match &outcome {
            Ok(text) => tracing::debug!(
                request_id = %request_id,
                model = %request.model,
                response_chars = text.len(),
                "Upstream call succeeded"
            ),
            Err(AppError::Transport(e)) => tracing::error!(
                request_id = %request_id,
                url = %self.messages_url,
                error = %e,
                error_source = ?e.source(),
                is_timeout = e.is_timeout(),
                is_connect = e.is_connect(),
                is_decode = e.is_decode(),
                "HTTP request failed to upstream"
            ),
            Err(e) => tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Upstream returned an error"
            ),
        }

        outcome
    }

    async fn send(&self, api_key: &str, request: &ClaudeMessagesRequest) -> Result<String> {
        let response = self
            .http_client
            .post(&self.messages_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", constants::ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        tracing::debug!(
            url = %self.messages_url,
            status = %response.status(),
            method = "POST",
            "HTTP request completed"
        );

        let reply: ClaudeMessagesResponse = response.json().await?;

        if let Some(usage) = &reply.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Upstream token usage"
            );
        }

        reply.into_text()
    }
}
