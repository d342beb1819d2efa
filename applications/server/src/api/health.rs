/// Health check API routes
use axum::Json;
use tilawa_client::HealthResponse;

/// GET /api/health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
