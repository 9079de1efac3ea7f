//! LLM Relay - Main entry point
//!
//! Loads configuration from the environment (and `.env`), then serves the
//! relay router until Ctrl-C or SIGTERM.

use anyhow::Result;
use llm_relay::{
    bind_listener, build_router,
    core::{init_metrics, init_tracing, AppConfig},
    AppState,
};
use std::sync::Arc;

fn main() -> Result<()> {
    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(worker_threads) = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
    {
        builder.worker_threads(worker_threads);
    }
    let runtime = builder.enable_all().build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    init_tracing();
    init_metrics();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");
    if !config.has_api_key() {
        tracing::warn!("ANTHROPIC_API_KEY is not set; /api/result will return 500");
    }

    let listener = bind_listener(&config.server).await?;
    let addr = listener.local_addr()?;

    let state = Arc::new(AppState::from_config(config)?);
    let app = build_router(state);

    tracing::info!(%addr, "Server running at http://localhost:{}", addr.port());
    tracing::info!("Relay endpoint: GET /api/result");
    tracing::info!("Metrics endpoint: /metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
