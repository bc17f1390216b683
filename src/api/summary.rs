use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::SummaryReport;

pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SummaryReport>>, ApiError> {
    let summary = state.catalog().summary().await?;
    Ok(Json(ApiResponse::success(summary)))
}
