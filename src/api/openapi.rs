//! OpenAPI document for the public endpoints.

use crate::api::models::{ErrorResponse, HealthResponse, ResultResponse};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LLM Relay",
        description = "Relays a fixed prompt to the Claude Messages API and returns the text."
    ),
    paths(crate::api::handlers::get_result, crate::api::handlers::health),
    components(schemas(ResultResponse, ErrorResponse, HealthResponse)),
    tags(
        (name = "relay", description = "Prompt relay"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
