use axum::{extract::State, response::Json as ResponseJson};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: u64,
    pub services: HealthServices,
}

#[derive(Debug, Serialize)]
pub struct HealthServices {
    pub database: &'static str,
}

/// Liveness probe with a round-trip through the database.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<HealthStatus>>, ApiError> {
    sqlx::query("SELECT 1").execute(&state.db().pool).await?;

    Ok(ResponseJson(ApiResponse::success(HealthStatus {
        status: "ok",
        timestamp: Utc::now(),
        uptime_secs: state.uptime().as_secs(),
        services: HealthServices { database: "ok" },
    })))
}
