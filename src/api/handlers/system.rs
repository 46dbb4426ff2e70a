//! System endpoints: health check and shop configuration.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::DataResponse;
use crate::app_state::AppState;
use crate::domain::schedule::time_slots;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /config/time-slots` — List bookable times of day.
#[utoipa::path(
    get,
    path = "/config/time-slots",
    tag = "System",
    summary = "List bookable time slots",
    description = "Returns the canonical `HH:mm` slot table used by booking validation.",
    responses(
        (status = 200, description = "Slot table", body = DataResponse<Vec<String>>),
    )
)]
pub async fn time_slots_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(DataResponse::new(time_slots())))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/time-slots", get(time_slots_handler))
}
