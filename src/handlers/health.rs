use axum::{response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The liveness response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Liveness probe. Touches no collaborator on purpose: a database outage
/// must not make the process look dead.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
