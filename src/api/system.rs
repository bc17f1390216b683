use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, HealthDto};

/// Reports process uptime and whether the database answers.
///
/// # Endpoint
/// `GET /api/health`
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HealthDto>>, ApiError> {
    let database = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            false
        }
    };

    Ok(Json(ApiResponse::success(HealthDto {
        status: if database { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
    })))
}

/// Drops every memoized catalog read.
///
/// # Endpoint
/// `POST /api/cache/invalidate`
pub async fn invalidate_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.catalog().invalidate_cache().await;
    Ok(Json(ApiResponse::success(())))
}
