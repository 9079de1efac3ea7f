//! Router assembly and listener binding shared by the binary and the tests.

use crate::api::handlers::{get_result, health, metrics_handler, AppState};
use crate::api::openapi::openapi_json;
use crate::core::{request_id_middleware, MetricsMiddleware, ServerConfig};
use anyhow::Context;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Build the application router.
///
/// Routes:
/// - `GET /api/result`: the relay endpoint
/// - `GET /health`, `GET /metrics`, `GET /api-docs/openapi.json`
/// - anything else: static files from `config.static_dir`, if set
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/api/result", get(get_result))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "Serving static files");
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    };

    router
        .layer(axum::middleware::from_fn(MetricsMiddleware::track_metrics))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind the listening socket for `server`.
///
/// `host` may be an IPv4 or IPv6 literal (brackets optional) or a hostname
/// such as `localhost`; hostnames are resolved and each address is tried in
/// turn.
pub async fn bind_listener(server: &ServerConfig) -> anyhow::Result<TcpListener> {
    let host = server.host.trim_start_matches('[').trim_end_matches(']');

    TcpListener::bind((host, server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", server.host, server.port))
}
