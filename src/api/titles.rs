use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::validation::{validate_page, validate_per_page, validate_title_id};
use crate::domain::TitleId;
use crate::models::{ListParams, TitleFields, TitleInput, TitleQuery, TitleRecord};

pub async fn list_titles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<TitleFields>>>, ApiError> {
    let catalog_config = state.config().read().await.catalog.clone();

    let (query, projection) = TitleQuery::from_params(&params, catalog_config.default_per_page)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    validate_page(query.page)?;
    validate_per_page(query.per_page, catalog_config.max_per_page)?;

    let titles = state.catalog().list_titles(&query, &projection).await?;
    Ok(Json(ApiResponse::success(titles)))
}

pub async fn get_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TitleRecord>>, ApiError> {
    let id = validate_title_id(id)?;
    let title = state.catalog().get_title(TitleId::new(id)).await?;
    Ok(Json(ApiResponse::success(title)))
}

pub async fn create_title(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TitleInput>,
) -> Result<(StatusCode, Json<ApiResponse<TitleRecord>>), ApiError> {
    let title = state
        .catalog()
        .create_title(input)
        .await
        .map_err(ApiError::from_write)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(title))))
}

pub async fn update_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<TitleInput>,
) -> Result<Json<ApiResponse<TitleRecord>>, ApiError> {
    let id = validate_title_id(id)?;
    let title = state
        .catalog()
        .update_title(TitleId::new(id), input)
        .await
        .map_err(ApiError::from_write)?;
    Ok(Json(ApiResponse::success(title)))
}

pub async fn delete_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TitleRecord>>, ApiError> {
    let id = validate_title_id(id)?;
    let title = state.catalog().delete_title(TitleId::new(id)).await?;
    Ok(Json(ApiResponse::success(title)))
}
