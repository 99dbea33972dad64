use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"healthy"` or `"unhealthy"`.
    pub status: &'static str,
    /// `"connected"` or `"disconnected"`.
    pub database: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Database error, present only when unhealthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Greeting served at `/`.
#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// GET /health -- service and database health. Always 200; the body says
/// whether the database answered.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = match quill_db::health_check(&state.pool).await {
        Ok(()) => HealthResponse {
            status: "healthy",
            database: "connected",
            version: env!("CARGO_PKG_VERSION"),
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            HealthResponse {
                status: "unhealthy",
                database: "disconnected",
                version: env!("CARGO_PKG_VERSION"),
                error: Some(e.to_string()),
            }
        }
    };
    Json(response)
}

/// GET / -- liveness greeting.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Hello, World!",
    })
}

/// Mount health check routes at the root level.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
