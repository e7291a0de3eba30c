//! Health check endpoint.

use axum::Json;

use crate::models::HealthResponse;

/// `GET /api/health` — reports liveness and the core library version.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: roster_core::version().to_string(),
    })
}
